use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use papyrus_core::models::request::Job;
use papyrus_core::models::status::Status;
use papyrus_storage::store::ObjectStore;
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::callback;
use crate::error::ApiError;
use crate::handlers;
use crate::middleware;
use crate::state::AppState;

pub mod converter;
pub mod health;
pub mod parser;

pub fn router<S: ObjectStore + Clone>(state: AppState<S>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/v1/converter/convert-file",
            post(converter::convert_file::<S>),
        )
        .route("/api/v1/parser/parse-file", post(parser::parse_file::<S>))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(axum_mw::from_fn(middleware::access_log::access_log))
                .layer(cors),
        )
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("no such route".to_string())
}

/// Run `job`, report the outcome to `callback_url`, and answer with the
/// delivery result: 201 when a success was delivered, 500 otherwise.
async fn run_and_report<S: ObjectStore>(
    state: &AppState<S>,
    job: Job,
    callback_url: &str,
) -> (StatusCode, Json<Value>) {
    let outcome = handlers::run_job(state, job).await;
    let delivery = callback::deliver(&state.http, callback_url, &outcome).await;

    if delivery.status == Status::Success {
        (StatusCode::CREATED, Json(json!({ "status": Status::Success })))
    } else {
        let body = serde_json::to_value(&delivery).unwrap_or_else(|_| json!({ "status": Status::Error }));
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body))
    }
}

fn require(value: &str, field: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::missing(field));
    }
    Ok(())
}
