use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("invalid database name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("tree error: {0}")]
    Tree(#[from] burrow_tree::TreeError),

    #[error("store error: {0}")]
    Store(#[from] burrow_store::StoreError),
}

pub type SdkResult<T> = Result<T, SdkError>;
