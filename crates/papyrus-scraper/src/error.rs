use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("corrupt input: {0}")]
    CorruptInput(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for ScrapeError {
    fn from(e: tokio::task::JoinError) -> Self {
        if e.is_panic() {
            ScrapeError::Internal("worker task panicked".to_string())
        } else {
            ScrapeError::Internal("worker task cancelled".to_string())
        }
    }
}
