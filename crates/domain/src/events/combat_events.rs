//! Combat-related domain events

use serde::{Deserialize, Serialize};

use crate::{CharacterId, Mob, RoomId};

/// Domain event for significant state changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum DomainEvent {
    /// A mob's hp reached zero during a combat round.
    ///
    /// Carries the mob as it was when it fell (its row is already deleted
    /// by the time subscribers run).
    #[serde(rename_all = "camelCase")]
    MobDefeated {
        mob: Mob,
        killer: Option<CharacterId>,
        room_id: RoomId,
    },
}

impl DomainEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::MobDefeated { .. } => "mob_defeated",
        }
    }
}
