//! Whole-root persistence for Burrow documents.
//!
//! A Burrow database is one document tree. Persisting it means writing the
//! entire root at once; there is no incremental or per-node storage. This
//! crate defines that contract and the backends that honour it.
//!
//! # Storage Backends
//!
//! All backends implement the [`RootStore`] trait:
//!
//! - [`FileRootStore`] -- JSON file replaced atomically on every commit
//! - [`InMemoryRootStore`] -- keeps the last committed text, for tests and embedding
//!
//! # Design Rules
//!
//! 1. A commit writes the whole root or nothing; readers never see a torn file.
//! 2. A commit overwrites any previously persisted root.
//! 3. Loading a store that was never committed yields no root, not an error.
//! 4. All I/O errors are propagated, never retried or silently ignored.

pub mod config;
pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use config::{StoreConfig, SyncMode};
pub use error::{StoreError, StoreResult};
pub use file::FileRootStore;
pub use memory::InMemoryRootStore;
pub use traits::RootStore;
