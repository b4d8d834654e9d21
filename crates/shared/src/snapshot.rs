//! Full state snapshot (`gameUpdate` payload).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use nightfall_domain::{AffixKind, CharacterClass, EquipSlot, Hostility, Rarity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameUpdate {
    pub message: String,
    pub player: PlayerData,
    pub room: RoomData,
    /// Names of the other characters in the room.
    pub players: Vec<String>,
    pub room_items: Vec<ItemData>,
    pub inventory: Vec<ItemData>,
    pub mobs: Vec<MobData>,
    pub in_combat: bool,
    pub zone_rooms: Vec<RoomData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerData {
    pub id: Uuid,
    pub name: String,
    pub class: CharacterClass,
    pub level: u32,
    pub experience: u32,
    pub experience_to_next_level: u32,
    pub unspent_stat_points: u32,
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
    pub resolve: i32,
    pub defense: i32,
    pub hp: i32,
    pub max_hp: i32,
    pub mana: i32,
    pub max_mana: i32,
    pub gold: u32,
    pub current_room_id: String,
    /// Strength after gear, as used by the melee formula.
    pub effective_strength: i32,
    /// Defense after gear, as used by the melee formula.
    pub effective_defense: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomData {
    pub id: String,
    pub name: String,
    pub description: String,
    pub exits: BTreeMap<String, String>,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemData {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub slot: EquipSlot,
    pub equipped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<Rarity>,
    pub damage: i32,
    pub armor: i32,
    pub magic_resist: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affixes: Vec<AffixData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffixData {
    pub name: String,
    pub kind: AffixKind,
    pub stats: BTreeMap<String, i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobData {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub hostility: Hostility,
    pub level: u32,
    pub hp: i32,
    pub max_hp: i32,
    /// Character this mob is currently attacking, if in combat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_target_id: Option<Uuid>,
}
