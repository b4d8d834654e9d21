//! Loot tables attached to mobs.

use serde::{Deserialize, Serialize};

use super::Quantity;
use crate::{BaseItemId, ItemTemplateId};

/// Ordered list of independently rolled loot groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LootTable(Vec<LootGroup>);

impl LootTable {
    pub fn new(groups: Vec<LootGroup>) -> Self {
        Self(groups)
    }

    pub fn groups(&self) -> &[LootGroup] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LootGroup {
    pub group_name: String,
    /// Probability in `[0, 1]` that the group drops at all.
    pub drop_chance: f64,
    #[serde(default)]
    pub guaranteed: bool,
    pub max_drops: u32,
    pub items: Vec<LootEntry>,
}

impl LootGroup {
    pub fn total_weight(&self) -> u32 {
        self.items.iter().map(|entry| entry.weight).sum()
    }

    /// Whether a uniform roll in `[0, 1)` lets the group drop.
    pub fn drops_on(&self, roll: f64) -> bool {
        self.guaranteed || (self.drop_chance > 0.0 && roll <= self.drop_chance)
    }

    /// Weighted pick for `roll` in `0..total_weight()`.
    pub fn pick(&self, roll: u32) -> Option<&LootEntry> {
        let mut remaining = roll;
        for entry in &self.items {
            if remaining < entry.weight {
                return Some(entry);
            }
            remaining -= entry.weight;
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub weight: u32,
    #[serde(flatten)]
    pub drop: LootDrop,
}

/// What a loot entry produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LootDrop {
    /// Copies of a static item template.
    Template {
        #[serde(rename = "itemTemplateId")]
        template_id: ItemTemplateId,
        #[serde(default)]
        quantity: Quantity,
    },
    /// A procedurally generated item of the given base type.
    Generate {
        #[serde(rename = "baseItemId")]
        base_item_id: BaseItemId,
        #[serde(rename = "itemLevel")]
        item_level: u32,
    },
}

/// Inclusive gold range for a mob level, if that level drops gold at all.
pub fn gold_range(level: u32) -> Option<(u32, u32)> {
    match level {
        1..=3 => Some((1, 5)),
        4..=6 => Some((4, 12)),
        7..=10 => Some((10, 25)),
        _ => None,
    }
}
