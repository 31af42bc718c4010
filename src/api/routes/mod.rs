//! Transform endpoints.
//!
//! Bodies are taken as raw bytes so that non-UTF-8 input and malformed JSON
//! go through the same `{"error": ...}` envelope as every other structural
//! failure. Transforms are CPU-bound and run on the blocking pool.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::pipeline::Pipeline;
use crate::transforms::TransformError;

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn features(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    run(state, body, Pipeline::features).await
}

pub async fn similar(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    run(state, body, Pipeline::similar).await
}

pub async fn simulate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    run(state, body, Pipeline::simulate).await
}

pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    run(state, body, Pipeline::predict).await
}

async fn run(
    state: AppState,
    body: Bytes,
    op: fn(&Pipeline, &str) -> Result<Value, TransformError>,
) -> Result<Json<Value>, ApiError> {
    let body = String::from_utf8(body.to_vec()).map_err(|e| {
        TransformError::InvalidInput(format!("Request body is not valid UTF-8: {}", e))
    })?;
    let pipeline = state.pipeline.clone();
    let result = tokio::task::spawn_blocking(move || op(&pipeline, &body))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(result?))
}
