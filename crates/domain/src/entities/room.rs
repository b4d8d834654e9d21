//! Room entity - a static topology node.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::RoomId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub description: String,
    /// direction -> destination room
    pub exits: BTreeMap<String, RoomId>,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Room {
    pub fn exit(&self, direction: &str) -> Option<&RoomId> {
        let direction = direction.trim().to_lowercase();
        self.exits.get(&direction)
    }

    /// Same floor and within `radius` on both axes.
    pub fn is_near(&self, other: &Room, radius: i32) -> bool {
        self.z == other.z && (self.x - other.x).abs() <= radius && (self.y - other.y).abs() <= radius
    }
}
