use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use papyrus_core::models::request::ParseFileRequest;
use papyrus_storage::store::ObjectStore;
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

use super::{require, run_and_report};

pub async fn parse_file<S: ObjectStore + Clone>(
    State(state): State<AppState<S>>,
    body: Result<Json<ParseFileRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(req) = body?;
    require(&req.s3_key, "s3_key")?;
    require(&req.callback_url, "callback_url")?;

    let callback_url = req.callback_url.clone();
    Ok(run_and_report(&state, req.into(), &callback_url).await)
}
