//! REST API endpoints.
//!
//! Axum-based HTTP API exposing the analytics transforms. Request and
//! response bodies are the same JSON documents the CLI reads and writes.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::transforms::TransformError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<TransformError> for ApiError {
    fn from(err: TransformError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::warn!(status = status.as_u16(), "Request failed: {}", self);
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/features", post(routes::features))
        .route("/api/similar", post(routes::similar))
        .route("/api/simulate", post(routes::simulate))
        .route("/api/predict", post(routes::predict))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS layer for the configured origin; `*` allows any origin.
pub fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            tracing::warn!("Invalid CORS origin {:?}, allowing any origin", origin);
            layer.allow_origin(Any)
        }
    }
}
