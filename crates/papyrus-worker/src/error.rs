use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use papyrus_convert::ConvertError;
use papyrus_core::error::CoreError;
use papyrus_scraper::ScrapeError;
use papyrus_storage::error::StorageError;

/// Why a job ended with an error status. The `Display` text is what the
/// caller receives as `message`.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Corrupt input: {0}")]
    CorruptInput(String),

    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for JobError {
    fn from(e: StorageError) -> Self {
        if e.is_not_found() {
            return JobError::UpstreamFailure(e.to_string());
        }
        tracing::error!(error = %e, "storage request failed");
        JobError::UpstreamFailure("storage request failed".to_string())
    }
}

impl From<ScrapeError> for JobError {
    fn from(e: ScrapeError) -> Self {
        match e {
            ScrapeError::UnsupportedFormat(ext) => JobError::UnsupportedFormat(ext),
            ScrapeError::CorruptInput(msg) => JobError::CorruptInput(msg),
            ScrapeError::Internal(msg) => JobError::Internal(msg),
        }
    }
}

impl From<ConvertError> for JobError {
    fn from(e: ConvertError) -> Self {
        match e {
            ConvertError::UnsupportedFormat(msg) => JobError::UnsupportedFormat(msg),
            other => JobError::Internal(other.to_string()),
        }
    }
}

impl From<CoreError> for JobError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::UnsupportedFormat(ext) => JobError::UnsupportedFormat(ext),
            other => JobError::Internal(other.to_string()),
        }
    }
}

/// Errors returned directly by route handlers, before any job runs.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Validation { field: String, msg: String },
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct ValidationBody {
    detail: Vec<FieldError>,
}

#[derive(Serialize)]
struct FieldError {
    field: String,
    msg: String,
}

impl ApiError {
    pub fn missing(field: &str) -> Self {
        ApiError::Validation {
            field: field.to_string(),
            msg: "field required".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(ErrorBody { error: msg })).into_response()
            }
            ApiError::Validation { field, msg } => {
                tracing::debug!(field = %field, msg = %msg, "request rejected");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(ValidationBody {
                        detail: vec![FieldError { field, msg }],
                    }),
                )
                    .into_response()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::Validation {
            field: "body".to_string(),
            msg: e.body_text(),
        }
    }
}
