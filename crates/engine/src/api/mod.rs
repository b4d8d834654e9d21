//! API layer - HTTP and WebSocket entry points.

pub mod connections;
pub mod http;
pub mod websocket;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::app::GameEngine;

pub use connections::{ConnectionManager, SharedConnectionManager};

/// Shared state for every handler.
pub struct AppState {
    pub engine: Arc<GameEngine>,
    pub connections: SharedConnectionManager,
}

pub fn router(state: Arc<AppState>) -> Router {
    http::routes()
        .route("/ws/{character_id}", get(websocket::ws_handler))
        .with_state(state)
}
