use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use burrow_types::Value;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::config::{StoreConfig, SyncMode};
use crate::error::{StoreError, StoreResult};
use crate::traits::RootStore;

/// File-backed root store.
///
/// The root is written as JSON text. Each commit writes a temporary file in
/// the target directory, syncs it, and renames it over the database file, so
/// a crash mid-commit leaves the previous root intact.
#[derive(Clone, Debug)]
pub struct FileRootStore {
    config: StoreConfig,
}

impl FileRootStore {
    /// Create a store from a full configuration.
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Create a store with default settings for the file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(StoreConfig::at(path))
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn parent_dir(&self) -> PathBuf {
        match self.config.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn corrupt(&self, reason: impl Into<String>) -> StoreError {
        StoreError::Corrupt {
            location: self.location(),
            reason: reason.into(),
        }
    }
}

impl RootStore for FileRootStore {
    fn load_root(&self) -> StoreResult<Option<Value>> {
        let text = match fs::read_to_string(&self.config.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.config.path.display(), "no database file; starting empty");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if text.trim().is_empty() {
            warn!(path = %self.config.path.display(), "database file is empty; starting empty");
            return Ok(None);
        }

        let root = Value::from_json_str(&text).map_err(|e| self.corrupt(e.to_string()))?;
        if !root.is_object() {
            return Err(self.corrupt(format!("root is a {}, expected an object", root.kind())));
        }

        debug!(path = %self.config.path.display(), bytes = text.len(), "root loaded");
        Ok(Some(root))
    }

    fn commit_root(&self, root: &Value) -> StoreResult<()> {
        if self.config.read_only {
            return Err(StoreError::ReadOnly);
        }

        let bytes = if self.config.pretty {
            serde_json::to_vec_pretty(root)
        } else {
            serde_json::to_vec(root)
        }
        .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let dir = self.parent_dir();
        if self.config.create_dirs {
            fs::create_dir_all(&dir)?;
        }

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(&bytes)?;
        tmp.flush()?;
        if self.config.sync == SyncMode::EveryCommit {
            tmp.as_file().sync_all()?;
        }

        tmp.persist(&self.config.path).map_err(|e| StoreError::Io(e.error))?;

        if self.config.sync == SyncMode::EveryCommit {
            sync_dir(&dir)?;
        }

        debug!(path = %self.config.path.display(), bytes = bytes.len(), "root committed");
        Ok(())
    }

    fn location(&self) -> String {
        self.config.path.display().to_string()
    }
}

/// Make a completed rename durable.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
