//! Connection management for WebSocket clients.
//!
//! Tracks which character each live connection plays and delivers
//! [`ServerEvent`]s to them. Room-addressed events are resolved here against
//! the store's current view of who stands in the room.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use nightfall_domain::RoomId;
use nightfall_shared::{EventBody, EventTarget, ServerEvent};
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::infrastructure::ports::{BroadcastPort, CharacterRepo};

/// A connected client.
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    pub connection_id: Uuid,
    pub character_id: Uuid,
}

/// Manages all active WebSocket connections.
pub struct ConnectionManager {
    /// character_id -> (info, sender). One live connection per character.
    connections: RwLock<HashMap<Uuid, (ConnectionInfo, mpsc::Sender<ServerEvent>)>>,
    characters: Arc<dyn CharacterRepo>,
}

pub type SharedConnectionManager = Arc<ConnectionManager>;

impl ConnectionManager {
    pub fn new(characters: Arc<dyn CharacterRepo>) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            characters,
        }
    }

    /// Register a connection, replacing any older one for the same character.
    pub async fn register(
        &self,
        connection_id: Uuid,
        character_id: Uuid,
        sender: mpsc::Sender<ServerEvent>,
    ) {
        let info = ConnectionInfo {
            connection_id,
            character_id,
        };
        let mut connections = self.connections.write().await;
        if connections.insert(character_id, (info, sender)).is_some() {
            tracing::info!(character_id = %character_id, "Replaced existing connection");
        }
        tracing::debug!(connection_id = %connection_id, character_id = %character_id, "Connection registered");
    }

    /// Unregister a connection. A newer connection for the same character is kept.
    pub async fn unregister(&self, connection_id: Uuid, character_id: Uuid) -> bool {
        let mut connections = self.connections.write().await;
        let current = connections
            .get(&character_id)
            .is_some_and(|(info, _)| info.connection_id == connection_id);
        if current {
            connections.remove(&character_id);
            tracing::debug!(connection_id = %connection_id, "Connection unregistered");
        }
        current
    }

    pub async fn is_connected(&self, character_id: Uuid) -> bool {
        self.connections.read().await.contains_key(&character_id)
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send to one character, if connected.
    pub async fn send_to_character(&self, character_id: Uuid, event: ServerEvent) {
        let connections = self.connections.read().await;
        if let Some((info, sender)) = connections.get(&character_id) {
            if let Err(e) = sender.try_send(event) {
                tracing::warn!(
                    connection_id = %info.connection_id,
                    error = %e,
                    "Failed to send event"
                );
            }
        }
    }

    /// Characters an event should reach.
    async fn recipients(&self, event: &ServerEvent) -> Vec<Uuid> {
        match (&event.target, &event.body) {
            (EventTarget::Character(id), _) => vec![*id],
            (EventTarget::Room, EventBody::Message(payload)) => {
                let Some(room_id) = payload.room_id.as_deref() else {
                    return Vec::new();
                };
                match self
                    .characters
                    .list_in_room(&RoomId::new(room_id), None)
                    .await
                {
                    Ok(present) => present
                        .into_iter()
                        .map(|c| c.id.to_uuid())
                        .filter(|id| !payload.exclude.contains(id))
                        .collect(),
                    Err(e) => {
                        tracing::warn!(room_id, error = %e, "Failed to resolve room recipients");
                        Vec::new()
                    }
                }
            }
            (EventTarget::Room, EventBody::GameUpdate(_)) => Vec::new(),
        }
    }
}

#[async_trait]
impl BroadcastPort for ConnectionManager {
    async fn broadcast(&self, events: Vec<ServerEvent>) {
        for event in events {
            for character_id in self.recipients(&event).await {
                self.send_to_character(character_id, event.clone()).await;
            }
        }
    }
}
