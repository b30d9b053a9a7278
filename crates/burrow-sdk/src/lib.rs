//! High-level API for Burrow.
//!
//! Burrow is an embedded document store: one tree of nested objects, held
//! in memory and written back to a single JSON file on demand. This crate
//! is the entry point for applications embedding it.
//!
//! ```no_run
//! use burrow_sdk::Burrow;
//!
//! # fn main() -> burrow_sdk::SdkResult<()> {
//! let db = Burrow::open("./data", "app")?;
//! let alice = db.node("users/alice")?;
//! alice.put("name", "Alice")?.put("age", 31)?;
//! alice.commit()?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod error;

pub use database::Burrow;
pub use error::{SdkError, SdkResult};

// Re-export key types
pub use burrow_store::{FileRootStore, InMemoryRootStore, RootStore, StoreConfig, StoreError, SyncMode};
pub use burrow_tree::{Map, Node, ObjectRef, Order, Query, TreeError, Value, ValueKind};
pub use burrow_types::NodePath;
