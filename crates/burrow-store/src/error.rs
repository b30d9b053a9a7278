/// Errors from root store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The root could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The persisted data is malformed or is not a document root.
    #[error("corrupt root at {location}: {reason}")]
    Corrupt { location: String, reason: String },

    /// Storage backend is read-only.
    #[error("store is read-only")]
    ReadOnly,

    /// The store configuration could not be read.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
