use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unsupported conversion: {0}")]
    UnsupportedFormat(String),

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("converter exited with {code}: {stderr}")]
    ProcessFailed { code: String, stderr: String },

    #[error("converter produced no output")]
    EmptyOutput,

    #[error("conversion timed out after {0:?}")]
    TimedOut(Duration),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
