//! Document tree model for Burrow.
//!
//! A Burrow database is a single tree of nested objects. A [`Node`] is a
//! lightweight handle onto one object of that tree: it navigates to (and
//! lazily creates) descendants, reads and writes typed values, mutates
//! lists, and commits the whole tree through the session's [`CommitGate`].
//!
//! # Sharing
//!
//! Every handle derived from one root shares the same underlying objects.
//! A write through any handle is immediately visible through all others.
//! Nothing is persisted until [`Node::commit`] (or [`Node::delete`], which
//! commits on its own) writes the entire root.
//!
//! # Modules
//!
//! - [`node`] -- handles, navigation, deletion, enumeration
//! - [`read`] -- typed getters with default fallback
//! - [`write`] -- typed puts and list mutation
//! - [`mapper`] -- serde bridge between application types and [`Value`]
//! - [`gate`] -- synchronous whole-root commit
//! - [`query`] -- filtering and sorting sibling sub-nodes

pub mod error;
pub mod gate;
pub mod mapper;
pub mod node;
pub mod query;
pub mod read;
pub mod write;

pub use burrow_types::{Map, ObjectRef, Value, ValueKind};
pub use error::{TreeError, TreeResult};
pub use gate::CommitGate;
pub use node::Node;
pub use query::{Order, Query};
