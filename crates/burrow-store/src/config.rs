use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// File extension used for database files.
pub const DATABASE_EXTENSION: &str = "json";

/// Flush/sync strategy for commits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// `fsync` the new file and its directory on every commit.
    #[default]
    EveryCommit,
    /// Rely on OS page-cache buffering (fastest, least durable).
    OsDefault,
}

/// Configuration for a file-backed database.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the database file.
    pub path: PathBuf,
    /// Pretty-print the JSON written on commit.
    pub pretty: bool,
    /// Sync strategy for commits.
    pub sync: SyncMode,
    /// Create missing parent directories on commit.
    pub create_dirs: bool,
    /// Reject every commit with [`StoreError::ReadOnly`].
    pub read_only: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("burrow.json"),
            pretty: false,
            sync: SyncMode::default(),
            create_dirs: true,
            read_only: false,
        }
    }
}

impl StoreConfig {
    /// Default configuration for the database file at `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Configuration for database `name` inside `dir` (`<dir>/<name>.json`).
    pub fn named(dir: impl AsRef<Path>, name: &str) -> Self {
        Self::at(dir.as_ref().join(format!("{name}.{DATABASE_EXTENSION}")))
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_sync(mut self, sync: SyncMode) -> Self {
        self.sync = sync;
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Parse a configuration from TOML. Missing fields take their defaults.
    pub fn from_toml_str(text: &str) -> StoreResult<Self> {
        toml::from_str(text).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Read a TOML configuration file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Render the configuration as TOML.
    pub fn to_toml_string(&self) -> StoreResult<String> {
        toml::to_string(self).map_err(|e| StoreError::Config(e.to_string()))
    }
}
