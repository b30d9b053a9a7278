use burrow_types::Value;

use crate::error::StoreResult;

/// Durable home of a single document root.
///
/// All implementations must satisfy these invariants:
/// - `commit_root` is all-or-nothing: after it returns `Ok`, the new root
///   is persisted in full; after it returns `Err`, the previous root is
///   still intact. No observer ever sees a partially written root.
/// - A commit replaces whatever was persisted before.
/// - `load_root` returns `Ok(None)` when nothing has been committed yet.
/// - Failures are returned to the caller, never retried internally.
pub trait RootStore: Send + Sync {
    /// Load the last committed root.
    ///
    /// Returns `Ok(None)` if no root has been persisted.
    /// Returns `Err` on I/O failure or if the persisted data is not an object.
    fn load_root(&self) -> StoreResult<Option<Value>>;

    /// Persist `root`, replacing the previously committed root.
    fn commit_root(&self, root: &Value) -> StoreResult<()>;

    /// Human-readable location of the store, for diagnostics.
    fn location(&self) -> String;
}
