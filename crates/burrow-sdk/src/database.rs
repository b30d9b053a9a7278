use std::path::Path;
use std::rc::Rc;

use burrow_store::{FileRootStore, InMemoryRootStore, RootStore, StoreConfig};
use burrow_tree::{CommitGate, Node, ObjectRef};
use tracing::info;

use crate::error::{SdkError, SdkResult};

/// An open Burrow database.
///
/// Holds the in-memory document tree and the gate that writes it back.
/// Every [`Node`] handed out shares that tree; a commit from any of them
/// persists all of it.
///
/// A database and its nodes are confined to one thread.
pub struct Burrow {
    gate: Rc<CommitGate>,
    root: ObjectRef,
}

impl Burrow {
    /// Open (or create) the database `name` in `dir`, stored as
    /// `<dir>/<name>.json`.
    ///
    /// A missing file opens an empty database; the file is first written on
    /// commit.
    pub fn open(dir: impl AsRef<Path>, name: &str) -> SdkResult<Self> {
        validate_name(name)?;
        Self::with_config(StoreConfig::named(dir, name))
    }

    /// Open a file-backed database with a full configuration.
    pub fn with_config(config: StoreConfig) -> SdkResult<Self> {
        Self::with_store(Box::new(FileRootStore::new(config)))
    }

    /// Open a database over any backend.
    pub fn with_store(store: Box<dyn RootStore>) -> SdkResult<Self> {
        let gate = Rc::new(CommitGate::new(store));
        let root = gate.load()?;
        info!(location = %gate.location(), entries = root.len(), "database opened");
        Ok(Self { gate, root })
    }

    /// Open an empty database that lives only in memory.
    pub fn in_memory() -> Self {
        Self {
            gate: Rc::new(CommitGate::new(Box::new(InMemoryRootStore::new()))),
            root: ObjectRef::new(),
        }
    }

    /// Handle onto the root node.
    pub fn root(&self) -> Node {
        Node::new_root(self.root.clone(), Rc::clone(&self.gate))
    }

    /// Shorthand for `self.root().node(path)`.
    pub fn node(&self, path: &str) -> SdkResult<Node> {
        Ok(self.root().node(path)?)
    }

    /// Persist the whole document.
    pub fn commit(&self) -> SdkResult<()> {
        Ok(self.gate.commit(&self.root)?)
    }

    /// Discard in-memory changes and load the last committed document.
    ///
    /// Handles obtained before the reload keep pointing at the old tree and
    /// are detached from this database from now on.
    pub fn reload(&mut self) -> SdkResult<()> {
        self.root = self.gate.load()?;
        info!(location = %self.gate.location(), entries = self.root.len(), "database reloaded");
        Ok(())
    }

    /// Location of the backing store (a file path, or `"memory"`).
    pub fn location(&self) -> String {
        self.gate.location()
    }

    /// Number of successful commits since the database was opened.
    pub fn commit_count(&self) -> u64 {
        self.gate.commit_count()
    }
}

impl std::fmt::Debug for Burrow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Burrow")
            .field("location", &self.gate.location())
            .field("entries", &self.root.len())
            .field("commits", &self.gate.commit_count())
            .finish()
    }
}

fn validate_name(name: &str) -> SdkResult<()> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.contains(['/', '\\']) {
        "name contains a path separator"
    } else if name == "." || name == ".." {
        "name is a relative directory"
    } else {
        return Ok(());
    };
    Err(SdkError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_places_file_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let db = Burrow::open(dir.path(), "app").unwrap();
        assert_eq!(db.location(), dir.path().join("app.json").display().to_string());
        assert!(!dir.path().join("app.json").exists());

        db.commit().unwrap();
        assert!(dir.path().join("app.json").exists());
    }

    #[test]
    fn open_rejects_bad_names() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["", "a/b", "..", r"a\b"] {
            let err = Burrow::open(dir.path(), name).unwrap_err();
            assert!(matches!(err, SdkError::InvalidName { .. }), "{name:?}");
        }
    }

    #[test]
    fn in_memory_starts_empty() {
        let db = Burrow::in_memory();
        assert!(db.root().is_empty());
        assert_eq!(db.location(), "memory");
        assert_eq!(db.commit_count(), 0);
    }

    #[test]
    fn root_handles_share_state() {
        let db = Burrow::in_memory();
        db.root().put("k", 1).unwrap();
        assert_eq!(db.root().get_number("k", 0), 1);
        assert!(db.root().same_object(&db.root()));
    }

    #[test]
    fn reload_discards_uncommitted_changes() {
        let store = InMemoryRootStore::new();
        let mut db = Burrow::with_store(Box::new(store.clone())).unwrap();
        db.root().put("kept", 1).unwrap();
        db.commit().unwrap();

        let stale = db.root();
        stale.put("dropped", 2).unwrap();
        db.reload().unwrap();

        assert!(db.root().has_child("kept"));
        assert!(!db.root().has_child("dropped"));
        assert!(!stale.same_object(&db.root()));
    }
}
