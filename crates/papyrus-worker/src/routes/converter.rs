use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use papyrus_core::models::request::ConvertFileRequest;
use papyrus_storage::store::ObjectStore;
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

use super::{require, run_and_report};

pub async fn convert_file<S: ObjectStore + Clone>(
    State(state): State<AppState<S>>,
    body: Result<Json<ConvertFileRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(req) = body?;
    require(&req.s3_key, "s3_key")?;
    require(&req.format_from, "format_from")?;
    require(&req.format_to, "format_to")?;
    require(&req.callback_url, "callback_url")?;

    let callback_url = req.callback_url.clone();
    Ok(run_and_report(&state, req.into(), &callback_url).await)
}
