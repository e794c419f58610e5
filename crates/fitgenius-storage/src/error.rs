use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid document at {path}: {reason}")]
    InvalidDocument { path: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("S3 GetObject error: {0}")]
    GetObject(String),

    #[error("S3 PutObject error: {0}")]
    PutObject(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
