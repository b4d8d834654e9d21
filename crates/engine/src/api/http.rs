//! HTTP routes.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use super::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/status", get(status))
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    connections: usize,
    active_combats: usize,
}

async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        connections: state.connections.connection_count().await,
        active_combats: state.engine.combat().active_rooms().await,
    })
}

/// Error type for HTTP handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound,
    Internal(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound => {
                (axum::http::StatusCode::NOT_FOUND, "Not found").into_response()
            }
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Request failed");
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error",
                )
                    .into_response()
            }
        }
    }
}

impl From<crate::infrastructure::ports::RepoError> for ApiError {
    fn from(e: crate::infrastructure::ports::RepoError) -> Self {
        ApiError::Internal(e.to_string())
    }
}
