//! Items and the read-only catalog entries they are created from.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::value_objects::{AffixKind, EquipSlot, ItemAttributes, Rarity, RolledAffix, StatKind};
use crate::{AffixId, BaseItemId, CharacterId, ItemId, ItemTemplateId, RoomId};

/// Where an item currently lives. An item has exactly one location;
/// destroyed items are deleted rather than left location-less.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "id")]
pub enum ItemLocation {
    Inventory(CharacterId),
    Room(RoomId),
}

/// What the item was made from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ItemOrigin {
    Template {
        template_id: ItemTemplateId,
    },
    Generated {
        base_item_id: BaseItemId,
        item_level: u32,
    },
}

/// An item instance.
///
/// Display data is denormalized onto the instance so snapshots and matching
/// never need a catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub slot: EquipSlot,
    pub attributes: ItemAttributes,
    pub rarity: Option<Rarity>,
    pub affixes: Vec<RolledAffix>,
    pub origin: ItemOrigin,
    pub location: ItemLocation,
    pub equipped: bool,
}

impl Item {
    pub fn from_template(template: &ItemTemplate, location: ItemLocation) -> Self {
        Self {
            id: ItemId::new(),
            name: template.name.clone(),
            description: template.description.clone(),
            slot: template.slot,
            attributes: template.attributes,
            rarity: None,
            affixes: Vec::new(),
            origin: ItemOrigin::Template {
                template_id: template.id,
            },
            location,
            equipped: false,
        }
    }

    pub fn matches_name(&self, input: &str) -> bool {
        let input = input.trim();
        !input.is_empty() && self.name.eq_ignore_ascii_case(input)
    }

    pub fn owner(&self) -> Option<CharacterId> {
        match &self.location {
            ItemLocation::Inventory(owner) => Some(*owner),
            ItemLocation::Room(_) => None,
        }
    }
}

/// Static, designer-authored item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemTemplate {
    pub id: ItemTemplateId,
    pub name: String,
    pub description: String,
    pub weight: f32,
    pub slot: EquipSlot,
    pub attributes: ItemAttributes,
}

/// Base type for procedurally generated items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseItem {
    pub id: BaseItemId,
    pub name: String,
    pub slot: EquipSlot,
    pub attributes: ItemAttributes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRange {
    pub min: i32,
    pub max: i32,
}

impl StatRange {
    pub fn fixed(value: i32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }
}

/// A named modifier that can be rolled onto generated items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Affix {
    pub id: AffixId,
    pub name: String,
    pub kind: AffixKind,
    pub required_level: u32,
    pub stats: BTreeMap<StatKind, StatRange>,
}

impl Affix {
    /// Roll each stat within its range. `roll(min, max)` is inclusive.
    pub fn roll(&self, mut roll: impl FnMut(i32, i32) -> i32) -> RolledAffix {
        let stats = self
            .stats
            .iter()
            .map(|(kind, range)| {
                let (lo, hi) = (range.min.min(range.max), range.min.max(range.max));
                (*kind, roll(lo, hi).clamp(lo, hi))
            })
            .collect();
        RolledAffix {
            affix_id: self.id,
            name: self.name.clone(),
            kind: self.kind,
            stats,
        }
    }
}
