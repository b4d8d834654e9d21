//! Value objects: immutable, validated building blocks of the world model.

mod class;
mod dice;
mod equipment;
mod loot;
mod stat_block;

pub use class::{CharacterClass, ClassProfile};
pub use dice::{DiceFormula, DiceParseError, Quantity};
pub use equipment::{AffixKind, EquipSlot, ItemAttributes, Rarity, RolledAffix};
pub use loot::{gold_range, LootDrop, LootEntry, LootGroup, LootTable};
pub use stat_block::{CoreStat, EffectiveStats, StatBlock, StatKind};
