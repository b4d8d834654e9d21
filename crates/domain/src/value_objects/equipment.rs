//! Equipment vocabulary: slots, rarity tiers, affix kinds.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::StatKind;
use crate::AffixId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipSlot {
    Head,
    Chest,
    Legs,
    Feet,
    Hands,
    WeaponMain,
    WeaponOff,
    /// Junk and trophies; never equippable.
    None,
}

impl EquipSlot {
    pub fn is_equippable(&self) -> bool {
        !matches!(self, EquipSlot::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl Rarity {
    /// Rarity tier for a uniform roll in `[0, 1)`.
    pub fn from_roll(roll: f64) -> Self {
        if roll <= 0.01 {
            Rarity::Rare
        } else if roll <= 0.15 {
            Rarity::Uncommon
        } else {
            Rarity::Common
        }
    }

    /// Inclusive affix count range for the tier.
    pub fn affix_count_range(&self) -> (u32, u32) {
        match self {
            Rarity::Common => (0, 0),
            Rarity::Uncommon => (1, 2),
            Rarity::Rare => (2, 3),
            Rarity::Legendary => (4, 5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AffixKind {
    Prefix,
    Suffix,
}

/// Flat combat attributes carried by an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemAttributes {
    pub damage: i32,
    pub armor: i32,
    pub magic_resist: i32,
}

impl ItemAttributes {
    pub fn damage(damage: i32) -> Self {
        Self {
            damage,
            ..Self::default()
        }
    }

    pub fn armor(armor: i32) -> Self {
        Self {
            armor,
            ..Self::default()
        }
    }
}

/// An affix as rolled onto one item instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolledAffix {
    pub affix_id: AffixId,
    pub name: String,
    pub kind: AffixKind,
    pub stats: BTreeMap<StatKind, i32>,
}
