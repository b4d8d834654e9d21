//! Command and event envelopes.
//!
//! ## Versioning Policy
//!
//! - New event types can be added (forward compatible)
//! - Renaming fields is a breaking change

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

use crate::snapshot::GameUpdate;

// =============================================================================
// Client → Engine
// =============================================================================

/// Inbound command: a verb plus an arbitrary JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub action: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl CommandEnvelope {
    pub fn new(action: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            action: action.into(),
            payload,
        }
    }

    /// Payload as trimmed text, accepting a bare string or `{ "target": "..." }`.
    pub fn text(&self) -> Option<&str> {
        let text = match &self.payload {
            serde_json::Value::String(s) => Some(s.as_str()),
            serde_json::Value::Object(map) => map
                .get("target")
                .or_else(|| map.get("name"))
                .or_else(|| map.get("message"))
                .and_then(|v| v.as_str()),
            _ => None,
        };
        text.map(str::trim).filter(|s| !s.is_empty())
    }
}

// =============================================================================
// Engine → Client
// =============================================================================

/// Who an event is addressed to.
///
/// `Room` is resolved at the transport boundary into the characters present
/// in the payload's `roomId`, minus its `exclude` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Character(Uuid),
    Room,
}

impl Serialize for EventTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EventTarget::Character(id) => serializer.collect_str(id),
            EventTarget::Room => serializer.serialize_str("room"),
        }
    }
}

impl<'de> Deserialize<'de> for EventTarget {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == "room" {
            return Ok(EventTarget::Room);
        }
        Uuid::parse_str(&raw)
            .map(EventTarget::Character)
            .map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for EventTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTarget::Character(id) => write!(f, "{}", id),
            EventTarget::Room => f.write_str("room"),
        }
    }
}

/// Plain text notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum EventBody {
    GameUpdate(Box<GameUpdate>),
    Message(MessagePayload),
}

/// Outbound event envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerEvent {
    pub target: EventTarget,
    #[serde(flatten)]
    pub body: EventBody,
}

impl ServerEvent {
    /// Private message to one character.
    pub fn message(character_id: Uuid, message: impl Into<String>) -> Self {
        Self {
            target: EventTarget::Character(character_id),
            body: EventBody::Message(MessagePayload {
                message: message.into(),
                room_id: None,
                exclude: Vec::new(),
            }),
        }
    }

    /// Message to everyone in `room_id` except `exclude`.
    pub fn room_message(
        room_id: impl Into<String>,
        message: impl Into<String>,
        exclude: Vec<Uuid>,
    ) -> Self {
        Self {
            target: EventTarget::Room,
            body: EventBody::Message(MessagePayload {
                message: message.into(),
                room_id: Some(room_id.into()),
                exclude,
            }),
        }
    }

    pub fn game_update(character_id: Uuid, update: GameUpdate) -> Self {
        Self {
            target: EventTarget::Character(character_id),
            body: EventBody::GameUpdate(Box::new(update)),
        }
    }

    /// The text carried by either body type.
    pub fn text(&self) -> &str {
        match &self.body {
            EventBody::GameUpdate(update) => &update.message,
            EventBody::Message(payload) => &payload.message,
        }
    }

    pub fn as_game_update(&self) -> Option<&GameUpdate> {
        match &self.body {
            EventBody::GameUpdate(update) => Some(update),
            EventBody::Message(_) => None,
        }
    }
}
