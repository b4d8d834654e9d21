//! Builders and doubles shared by unit and scenario tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_fixtures::{character, mob};
//!
//! let aria = character("Aria", CharacterClass::Vanguard, RoomId::new("the-arena"));
//! let pup = mob("Gloomfang Pup", RoomId::new("the-arena"));
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use nightfall_domain::{
    Character, CharacterClass, EquipSlot, Hostility, Item, ItemAttributes, ItemId, ItemLocation,
    ItemOrigin, ItemTemplateId, LootTable, Mob, MobId, Room, RoomId,
};
use nightfall_shared::ServerEvent;

use crate::app::Repositories;
use crate::content::StaticContent;
use crate::infrastructure::memory::InMemoryStore;
use crate::infrastructure::ports::BroadcastPort;

// =============================================================================
// Entities
// =============================================================================

pub fn character(name: &str, class: CharacterClass, room_id: RoomId) -> Character {
    Character::new(name, class, room_id)
}

/// A hostile beast shaped like the arena's Gloomfang Pup: 15 hp, str 4, def 1.
pub fn mob(name: &str, room_id: RoomId) -> Mob {
    let mut keywords: Vec<String> = name.to_lowercase().split_whitespace().map(String::from).collect();
    keywords.push(name.to_lowercase());
    Mob {
        id: MobId::new(),
        name: name.to_string(),
        description: format!("A {} snarls at you.", name.to_lowercase()),
        keywords,
        hostility: Hostility::Hostile,
        level: 2,
        hp: 15,
        max_hp: 15,
        strength: 4,
        defense: 1,
        experience_award: 5,
        can_drop_gold: false,
        loot_table: LootTable::default(),
        room_id,
    }
}

pub fn friendly_mob(name: &str, room_id: RoomId) -> Mob {
    Mob {
        hostility: Hostility::Friendly,
        experience_award: 0,
        ..mob(name, room_id)
    }
}

pub fn room(id: &str, x: i32, y: i32, exits: &[(&str, &str)]) -> Room {
    Room {
        id: RoomId::new(id),
        name: id.replace('-', " "),
        description: format!("You are in {}.", id.replace('-', " ")),
        exits: exits
            .iter()
            .map(|(direction, target)| (direction.to_string(), RoomId::new(*target)))
            .collect::<BTreeMap<_, _>>(),
        x,
        y,
        z: 0,
    }
}

/// Unequippable junk lying on a room floor.
pub fn item_in_room(name: &str, room_id: RoomId) -> Item {
    Item {
        id: ItemId::new(),
        name: name.to_string(),
        description: format!("A {}.", name),
        slot: EquipSlot::None,
        attributes: ItemAttributes::default(),
        rarity: None,
        affixes: Vec::new(),
        origin: ItemOrigin::Template {
            template_id: ItemTemplateId::new(0),
        },
        location: ItemLocation::Room(room_id),
        equipped: false,
    }
}

pub fn gear(name: &str, slot: EquipSlot, attributes: ItemAttributes, owner: &Character) -> Item {
    Item {
        slot,
        attributes,
        location: ItemLocation::Inventory(owner.id),
        ..item_in_room(name, owner.room_id.clone())
    }
}

// =============================================================================
// Wiring
// =============================================================================

pub fn repositories(store: Arc<InMemoryStore>) -> Repositories {
    Repositories::from_store(store, Arc::new(StaticContent::haven()))
}

/// Broadcast double that keeps everything it was asked to send.
#[derive(Default)]
pub struct RecordingBroadcast {
    sent: Mutex<Vec<ServerEvent>>,
}

impl RecordingBroadcast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<ServerEvent> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }
}

#[async_trait]
impl BroadcastPort for RecordingBroadcast {
    async fn broadcast(&self, events: Vec<ServerEvent>) {
        self.sent.lock().unwrap().extend(events);
    }
}
