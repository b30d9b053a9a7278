use burrow_store::StoreError;
use thiserror::Error;

/// Errors from document tree operations.
#[derive(Debug, Error)]
pub enum TreeError {
    /// Navigation could not resolve or create a node.
    #[error("cannot create node {path}: {reason}")]
    NodeCreation { path: String, reason: String },

    /// A value could not be converted to or from the requested shape.
    #[error("invalid type for key {key:?}: {reason}")]
    InvalidType { key: String, reason: String },

    /// The operation requires a structure that is not there.
    #[error("key {key:?} does not exist: {reason}")]
    NotExists { key: String, reason: String },

    /// The persistence backend failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl TreeError {
    pub(crate) fn invalid_type(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidType {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
