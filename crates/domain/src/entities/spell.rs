//! Spells, their ordered effects, and status effects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::CharacterClass;
use crate::{CharacterId, SpellId, StatusEffectId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpellType {
    Class,
    Universal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    #[serde(rename = "SELF")]
    Caster,
    TargetEnemy,
    TargetAlly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DamageType {
    Physical,
    Arcane,
    Poison,
    Lightning,
    Nature,
}

/// One step of a spell, applied in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "effectType")]
pub enum SpellEffect {
    #[serde(rename_all = "camelCase")]
    DirectDamage {
        base_value: i32,
        scaling_factor: f32,
        damage_type: DamageType,
    },
    #[serde(rename_all = "camelCase")]
    Heal { base_value: i32, scaling_factor: f32 },
    #[serde(rename_all = "camelCase")]
    ApplyStatusEffect {
        status_effect_id: StatusEffectId,
        /// Percent chance in `0..=100`.
        chance: u32,
        duration: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spell {
    pub id: SpellId,
    pub name: String,
    pub description: String,
    pub spell_type: SpellType,
    pub required_class: Option<CharacterClass>,
    pub required_level: u32,
    pub mana_cost: i32,
    pub target_type: TargetType,
    /// Rounds spent casting before the effects land.
    pub casting_time: u32,
    /// Rounds before the spell can be cast again.
    pub cooldown: u32,
    pub effects: Vec<SpellEffect>,
}

impl Spell {
    pub fn is_available_to(&self, class: CharacterClass, level: u32) -> bool {
        if level < self.required_level {
            return false;
        }
        match (self.spell_type, self.required_class) {
            (SpellType::Class, Some(required)) => required == class,
            _ => true,
        }
    }
}

/// What a status does each round while it lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusKind {
    /// Loses hp at the start of each round.
    DamageOverTime,
    /// Loses its action.
    Stun,
    /// Slowed; no mechanical effect in melee yet.
    Snare,
    /// Loses mana at the start of each round.
    ManaDrain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEffect {
    pub id: StatusEffectId,
    pub name: String,
    pub description: String,
    pub kind: StatusKind,
    pub base_value: i32,
    pub default_duration: u32,
}

/// A spell in a character's spellbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownSpell {
    pub character_id: CharacterId,
    pub spell_id: SpellId,
    pub cooldown_until: Option<DateTime<Utc>>,
}

impl KnownSpell {
    pub fn new(character_id: CharacterId, spell_id: SpellId) -> Self {
        Self {
            character_id,
            spell_id,
            cooldown_until: None,
        }
    }

    pub fn is_on_cooldown(&self, now: DateTime<Utc>) -> bool {
        self.cooldown_until.is_some_and(|until| until > now)
    }
}
