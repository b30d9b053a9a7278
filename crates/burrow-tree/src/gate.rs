use std::cell::Cell;
use std::fmt;

use burrow_store::{RootStore, StoreError};
use burrow_types::{ObjectRef, Value};
use tracing::debug;

use crate::error::TreeResult;

/// Synchronous whole-root write-back.
///
/// One gate is shared by every node of a session. A commit serializes the
/// entire root, never just the subtree it was requested from, and returns
/// only after the backend has finished writing. In-memory state is left
/// untouched, so handles remain usable afterwards.
pub struct CommitGate {
    store: Box<dyn RootStore>,
    commits: Cell<u64>,
}

impl CommitGate {
    /// Create a gate writing through the given backend.
    pub fn new(store: Box<dyn RootStore>) -> Self {
        Self {
            store,
            commits: Cell::new(0),
        }
    }

    /// Load the persisted root, or an empty object if nothing was committed.
    pub fn load(&self) -> TreeResult<ObjectRef> {
        match self.store.load_root()? {
            Some(Value::Object(root)) => {
                debug!(location = %self.store.location(), entries = root.len(), "document loaded");
                Ok(root)
            }
            Some(other) => Err(StoreError::Corrupt {
                location: self.store.location(),
                reason: format!("root is a {}, expected an object", other.kind()),
            }
            .into()),
            None => Ok(ObjectRef::new()),
        }
    }

    /// Persist the whole tree rooted at `root`.
    ///
    /// Backend failures propagate unchanged; nothing is retried.
    pub fn commit(&self, root: &ObjectRef) -> TreeResult<()> {
        self.store.commit_root(&Value::Object(root.clone()))?;
        self.commits.set(self.commits.get() + 1);
        debug!(
            location = %self.store.location(),
            commits = self.commits.get(),
            "document committed"
        );
        Ok(())
    }

    /// Number of successful commits through this gate.
    pub fn commit_count(&self) -> u64 {
        self.commits.get()
    }

    /// Location of the backing store.
    pub fn location(&self) -> String {
        self.store.location()
    }
}

impl fmt::Debug for CommitGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitGate")
            .field("location", &self.store.location())
            .field("commits", &self.commits.get())
            .finish()
    }
}
