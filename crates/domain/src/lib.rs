//! Nightfall domain: the pure world model of the simulation.
//!
//! No I/O and no randomness source live here. Operations that need chance
//! take the roll as an argument or a closure.

extern crate self as nightfall_domain;

pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod value_objects;

pub use entities::{
    experience_for_level, Affix, BaseItem, Character, DamageType, DeathOutcome, Hostility, Item,
    ItemLocation, ItemOrigin, ItemTemplate, KnownSpell, LevelUp, Mob, Progress, Room, Spell,
    SpellEffect, SpellType, StatAllocationError, StatRange, StatusEffect, StatusKind, TargetType,
    MAX_HP_PER_LEVEL, STARTING_EXPERIENCE_TO_NEXT, STARTING_GOLD, STAT_POINTS_PER_LEVEL,
};

pub use error::DomainError;
pub use events::DomainEvent;

pub use ids::{
    AffixId, BaseItemId, CharacterId, ItemId, ItemTemplateId, MobId, RoomId, SpellId,
    StatusEffectId,
};

pub use value_objects::{
    gold_range, AffixKind, CharacterClass, ClassProfile, CoreStat, DiceFormula, DiceParseError,
    EffectiveStats, EquipSlot, ItemAttributes, LootDrop, LootEntry, LootGroup, LootTable,
    Quantity, Rarity, RolledAffix, StatBlock, StatKind,
};
