use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {key}")]
    NotFound { key: String },

    #[error("download failed: object {key} is missing or empty")]
    Empty { key: String },

    #[error("S3 GetObject error: {0}")]
    GetObject(String),

    #[error("S3 PutObject error: {0}")]
    PutObject(String),

    #[error("S3 presign error: {0}")]
    Presign(String),
}

impl StorageError {
    /// Whether the object itself is absent, as opposed to S3 misbehaving.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. } | StorageError::Empty { .. })
    }
}
