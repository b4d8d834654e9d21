//! Applying a spell's ordered effects to a target.
//!
//! The resolver works on [`EffectiveStats`] for both sides so the same code
//! path serves characters and mobs, in and out of combat. Callers copy the
//! target's resulting hp back onto the entity and decide what to do with
//! any statuses that landed.

use std::sync::Arc;

use nightfall_domain::{EffectiveStats, Spell, SpellEffect, StatusEffect};

use super::SpellError;
use crate::infrastructure::ports::{ContentRepo, RandomPort};

/// A status that landed and should last `duration` rounds.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedStatus {
    pub status: StatusEffect,
    pub duration: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectOutcome {
    pub messages: Vec<String>,
    pub applied: Vec<AppliedStatus>,
    pub damage_dealt: i32,
}

pub struct SpellEffectResolver {
    content: Arc<dyn ContentRepo>,
    random: Arc<dyn RandomPort>,
}

impl SpellEffectResolver {
    pub fn new(content: Arc<dyn ContentRepo>, random: Arc<dyn RandomPort>) -> Self {
        Self { content, random }
    }

    pub fn resolve(
        &self,
        spell: &Spell,
        caster: &EffectiveStats,
        target: &mut EffectiveStats,
    ) -> Result<EffectOutcome, SpellError> {
        let mut outcome = EffectOutcome::default();
        for effect in &spell.effects {
            if target.hp <= 0 {
                break;
            }
            match effect {
                SpellEffect::DirectDamage {
                    base_value,
                    scaling_factor,
                    ..
                } => {
                    let damage = scaled(*base_value, caster.attributes.intelligence, *scaling_factor);
                    target.hp = (target.hp - damage).max(0);
                    outcome.damage_dealt += damage;
                    outcome.messages.push(format!(
                        "{}'s {} hits {} for {} damage!",
                        caster.name, spell.name, target.name, damage
                    ));
                }
                SpellEffect::Heal {
                    base_value,
                    scaling_factor,
                } => {
                    let amount = scaled(*base_value, caster.attributes.wisdom, *scaling_factor);
                    let before = target.hp;
                    target.hp = (target.hp + amount).min(target.max_hp.max(before));
                    outcome.messages.push(format!(
                        "{}'s {} heals {} for {} health!",
                        caster.name,
                        spell.name,
                        target.name,
                        target.hp - before
                    ));
                }
                SpellEffect::ApplyStatusEffect {
                    status_effect_id,
                    chance,
                    duration,
                } => {
                    let status = self
                        .content
                        .status_effect(*status_effect_id)
                        .ok_or(SpellError::UnknownStatusEffect(*status_effect_id))?;
                    if self.random.gen_range(1, 100) <= *chance as i32 {
                        outcome.messages.push(format!(
                            "{}'s {} applies {} to {}!",
                            caster.name, spell.name, status.name, target.name
                        ));
                        let duration = if *duration > 0 {
                            *duration
                        } else {
                            status.default_duration
                        };
                        outcome.applied.push(AppliedStatus { status, duration });
                    } else {
                        outcome
                            .messages
                            .push(format!("{} resists {}.", target.name, status.name));
                    }
                }
            }
        }
        Ok(outcome)
    }
}

fn scaled(base: i32, stat: i32, factor: f32) -> i32 {
    let value = (base as f32 + stat as f32 * factor).floor() as i32;
    value.max(1)
}
