//! Domain entities.

mod character;
mod item;
mod mob;
mod room;
mod spell;

pub use character::{
    experience_for_level, Character, DeathOutcome, LevelUp, Progress, StatAllocationError,
    MAX_HP_PER_LEVEL, STARTING_EXPERIENCE_TO_NEXT, STARTING_GOLD, STAT_POINTS_PER_LEVEL,
};
pub use item::{Affix, BaseItem, Item, ItemLocation, ItemOrigin, ItemTemplate, StatRange};
pub use mob::{Hostility, Mob};
pub use room::Room;
pub use spell::{
    DamageType, KnownSpell, Spell, SpellEffect, SpellType, StatusEffect, StatusKind, TargetType,
};
