//! Foundation types for Burrow.
//!
//! This crate provides the dynamic value model the document tree is built
//! from. Every other Burrow crate depends on `burrow-types`.
//!
//! # Key Types
//!
//! - [`Value`] -- Tagged union of everything a document can hold
//! - [`ObjectRef`] -- Shared, mutable handle to a nested object
//! - [`ValueKind`] -- The variant tag of a [`Value`], for diagnostics
//! - [`NodePath`] -- A parsed, slash-delimited relative node path

pub mod error;
pub mod path;
pub mod value;

pub use error::{TypeError, TypeResult};
pub use path::NodePath;
pub use value::{Map, ObjectRef, Value, ValueKind};
