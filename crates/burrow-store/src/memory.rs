//! In-memory root store for testing and ephemeral use.
//!
//! [`InMemoryRootStore`] keeps the JSON text of the last committed root
//! behind an `Arc<RwLock<..>>`. Clones share that state, so a test can hand
//! one clone to a database and inspect commits through another.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use burrow_types::Value;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::RootStore;

#[derive(Debug, Default)]
struct MemoryState {
    snapshot: Option<String>,
    commits: u64,
    read_only: bool,
}

/// An in-memory implementation of [`RootStore`].
///
/// Data is lost when the last clone is dropped.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRootStore {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryRootStore {
    /// Create a store with nothing committed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose last committed root is the given JSON text.
    pub fn with_snapshot(json: impl Into<String>) -> Self {
        let store = Self::new();
        store.write_state().snapshot = Some(json.into());
        store
    }

    /// JSON text of the last committed root.
    pub fn snapshot(&self) -> Option<String> {
        self.read_state().snapshot.clone()
    }

    /// Number of successful commits.
    pub fn commit_count(&self) -> u64 {
        self.read_state().commits
    }

    /// Make subsequent commits fail with [`StoreError::ReadOnly`].
    pub fn set_read_only(&self, read_only: bool) {
        self.write_state().read_only = read_only;
    }

    // Every write leaves the state consistent, so poisoning is ignored.
    fn read_state(&self) -> RwLockReadGuard<'_, MemoryState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, MemoryState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl RootStore for InMemoryRootStore {
    fn load_root(&self) -> StoreResult<Option<Value>> {
        let state = self.read_state();
        let Some(text) = state.snapshot.as_deref() else {
            return Ok(None);
        };

        let root = Value::from_json_str(text).map_err(|e| StoreError::Corrupt {
            location: self.location(),
            reason: e.to_string(),
        })?;
        if !root.is_object() {
            return Err(StoreError::Corrupt {
                location: self.location(),
                reason: format!("root is a {}, expected an object", root.kind()),
            });
        }
        Ok(Some(root))
    }

    fn commit_root(&self, root: &Value) -> StoreResult<()> {
        let text = serde_json::to_string(root).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut state = self.write_state();
        if state.read_only {
            return Err(StoreError::ReadOnly);
        }
        state.snapshot = Some(text);
        state.commits += 1;

        debug!(commits = state.commits, "root committed to memory");
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_types::ObjectRef;

    fn root_with(key: &str, value: Value) -> Value {
        let obj = ObjectRef::new();
        obj.insert(key, value);
        Value::Object(obj)
    }

    #[test]
    fn empty_store_loads_none() {
        let store = InMemoryRootStore::new();
        assert!(store.load_root().unwrap().is_none());
        assert_eq!(store.commit_count(), 0);
    }

    #[test]
    fn commit_then_load() {
        let store = InMemoryRootStore::new();
        let root = root_with("k", Value::from("v"));
        store.commit_root(&root).unwrap();

        assert_eq!(store.load_root().unwrap(), Some(root));
        assert_eq!(store.snapshot().as_deref(), Some(r#"{"k":"v"}"#));
        assert_eq!(store.commit_count(), 1);
    }

    #[test]
    fn clones_share_state() {
        let store = InMemoryRootStore::new();
        let observer = store.clone();
        store.commit_root(&root_with("a", Value::from(1))).unwrap();
        assert_eq!(observer.commit_count(), 1);
        assert!(observer.snapshot().is_some());
    }

    #[test]
    fn read_only_keeps_previous_snapshot() {
        let store = InMemoryRootStore::new();
        store.commit_root(&root_with("a", Value::from(1))).unwrap();
        store.set_read_only(true);

        let err = store.commit_root(&root_with("b", Value::from(2))).unwrap_err();
        assert!(matches!(err, StoreError::ReadOnly));
        assert_eq!(store.snapshot().as_deref(), Some(r#"{"a":1}"#));
        assert_eq!(store.commit_count(), 1);
    }

    #[test]
    fn with_snapshot_seeds_root() {
        let store = InMemoryRootStore::with_snapshot(r#"{"seed":true}"#);
        let root = store.load_root().unwrap().unwrap();
        assert_eq!(root, root_with("seed", Value::from(true)));
    }

    #[test]
    fn non_object_snapshot_is_corrupt() {
        let store = InMemoryRootStore::with_snapshot("42");
        assert!(matches!(store.load_root(), Err(StoreError::Corrupt { .. })));
    }
}
