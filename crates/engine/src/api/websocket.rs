//! WebSocket handling for player connections.
//!
//! Development transport: `/ws/{character_id}` attaches a socket to an
//! existing character. Inbound frames are [`CommandEnvelope`] JSON, outbound
//! frames are [`ServerEvent`] JSON. There is no authentication.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use nightfall_domain::CharacterId;
use nightfall_shared::{CommandEnvelope, ServerEvent};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::http::ApiError;
use super::AppState;
use crate::infrastructure::ports::BroadcastPort;

/// Buffer size for per-connection message channel.
const CONNECTION_CHANNEL_BUFFER: usize = 256;

/// WebSocket upgrade handler - entry point for new connections.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(character_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let character_id = CharacterId::from(character_id);
    if state
        .engine
        .repositories()
        .characters
        .get(character_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound);
    }
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, character_id)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, character_id: CharacterId) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let connection_id = Uuid::new_v4();

    let (tx, mut rx) = mpsc::channel::<ServerEvent>(CONNECTION_CHANNEL_BUFFER);
    state
        .connections
        .register(connection_id, character_id.to_uuid(), tx.clone())
        .await;
    tracing::info!(connection_id = %connection_id, character_id = %character_id, "WebSocket connection established");

    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Failed to serialize event"),
            }
        }
    });

    match state.engine.handle_connect(character_id).await {
        Ok(events) => state.connections.broadcast(events).await,
        Err(e) => tracing::error!(character_id = %character_id, error = %e, "Connect failed"),
    }

    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<CommandEnvelope>(&text) {
                Ok(envelope) => {
                    match state.engine.process_command(character_id, envelope).await {
                        Ok(events) => state.connections.broadcast(events).await,
                        Err(e) => {
                            tracing::error!(character_id = %character_id, error = %e, "Command failed");
                            let _ = tx.try_send(ServerEvent::message(
                                character_id.to_uuid(),
                                "Something went wrong. Please try again.",
                            ));
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(connection_id = %connection_id, error = %e, "Failed to parse command");
                    let _ = tx.try_send(ServerEvent::message(
                        character_id.to_uuid(),
                        "Invalid command format.",
                    ));
                }
            },
            Ok(Message::Close(_)) => {
                tracing::info!(connection_id = %connection_id, "WebSocket closed by client");
                break;
            }
            Err(e) => {
                tracing::error!(connection_id = %connection_id, error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    if state
        .connections
        .unregister(connection_id, character_id.to_uuid())
        .await
    {
        match state.engine.handle_disconnect(character_id).await {
            Ok(events) => state.connections.broadcast(events).await,
            Err(e) => tracing::error!(character_id = %character_id, error = %e, "Disconnect failed"),
        }
    }
    send_task.abort();

    tracing::info!(connection_id = %connection_id, "WebSocket connection terminated");
}
