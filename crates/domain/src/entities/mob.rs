//! Mob entity - a non-player combatant placed in a room.

use serde::{Deserialize, Serialize};

use crate::value_objects::{EffectiveStats, LootTable, StatBlock};
use crate::{MobId, RoomId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Hostility {
    Friendly,
    Neutral,
    Hostile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mob {
    pub id: MobId,
    pub name: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub hostility: Hostility,
    pub level: u32,
    pub hp: i32,
    pub max_hp: i32,
    pub strength: i32,
    pub defense: i32,
    pub experience_award: u32,
    pub can_drop_gold: bool,
    #[serde(default)]
    pub loot_table: LootTable,
    pub room_id: RoomId,
}

impl Mob {
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_hostile(&self) -> bool {
        self.hostility == Hostility::Hostile
    }

    pub fn is_friendly(&self) -> bool {
        self.hostility == Hostility::Friendly
    }

    pub fn set_hp(&mut self, hp: i32) {
        self.hp = hp.clamp(0, self.max_hp);
    }

    /// Case-insensitive keyword match against a player's target text.
    pub fn matches_keyword(&self, input: &str) -> bool {
        let input = input.trim();
        !input.is_empty()
            && self
                .keywords
                .iter()
                .any(|keyword| keyword.eq_ignore_ascii_case(input))
    }

    /// Mobs carry no equipment, so their stats pass through unchanged.
    pub fn effective_stats(&self) -> EffectiveStats {
        EffectiveStats {
            name: self.name.clone(),
            hp: self.hp,
            max_hp: self.max_hp,
            attributes: StatBlock {
                strength: self.strength,
                ..StatBlock::default()
            },
            defense: self.defense,
            damage: 0,
            armor: 0,
            magic_resist: 0,
        }
    }
}
