//! REST API endpoints.
//!
//! Axum-based HTTP API exposing player elo, recent-window averages, the last
//! match, and the tracked player's monthly wins, all under `/api/v1`.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::engine::StatsError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("No data: {0}")]
    NoData(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Scan limit exceeded: {0}")]
    ScanLimitExceeded(String),

    #[error("Upstream timed out: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::NoData(_) => (StatusCode::UNPROCESSABLE_ENTITY, "NO_DATA"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::ScanLimitExceeded(_) => (StatusCode::BAD_GATEWAY, "SCAN_LIMIT_EXCEEDED"),
            ApiError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StatsError> for ApiError {
    fn from(e: StatsError) -> Self {
        match e {
            StatsError::NotFound(m) => ApiError::NotFound(m),
            StatsError::Upstream(m) => ApiError::Upstream(m),
            StatsError::InvalidRecord(r) => {
                warn!("Rejected upstream record: {}", r);
                ApiError::Upstream(format!("malformed match record ({})", r))
            }
            StatsError::NoData(m) => ApiError::NoData(m),
            e @ StatsError::ScanLimitExceeded { .. } => ApiError::ScanLimitExceeded(e.to_string()),
            e @ StatsError::Cancelled { .. } => ApiError::Timeout(e.to_string()),
            StatsError::Pace(p) => ApiError::NoData(p.to_string()),
        }
    }
}

/// CORS policy for `origin`: `*` allows any origin.
fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);
    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            warn!("Invalid CORS origin {:?}, allowing any", origin);
            layer.allow_origin(Any)
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/hello", get(routes::health::hello))
        .route("/elo/:username", get(routes::player::elo))
        .route("/last20/:username", get(routes::player::last_window))
        .route("/lastGame/:username", get(routes::player::last_game))
        .route("/winsAgostoRui", get(routes::tracker::wins))
        .route("/media", get(routes::tracker::media));

    let cors = cors_layer(&state.cors_origin);

    Router::new()
        .route("/", get(routes::health::health))
        .nest("/api/v1", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
