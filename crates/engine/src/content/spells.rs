use nightfall_domain::{
    CharacterClass, DamageType, Spell, SpellEffect, SpellId, SpellType, StatusEffect,
    StatusEffectId, StatusKind, TargetType,
};

pub const POISONED: StatusEffectId = StatusEffectId::new(1);
pub const STUNNED: StatusEffectId = StatusEffectId::new(2);
pub const SNARED: StatusEffectId = StatusEffectId::new(3);
pub const MANA_DRAIN: StatusEffectId = StatusEffectId::new(4);

pub fn all_status_effects() -> Vec<StatusEffect> {
    vec![
        StatusEffect {
            id: POISONED,
            name: "Poisoned".into(),
            description: "Takes damage over time from poison.".into(),
            kind: StatusKind::DamageOverTime,
            base_value: 5,
            default_duration: 3,
        },
        StatusEffect {
            id: STUNNED,
            name: "Stunned".into(),
            description: "Unable to take actions for the duration.".into(),
            kind: StatusKind::Stun,
            base_value: 0,
            default_duration: 1,
        },
        StatusEffect {
            id: SNARED,
            name: "Snared".into(),
            description: "Unable to move or flee for the duration.".into(),
            kind: StatusKind::Snare,
            base_value: 0,
            default_duration: 3,
        },
        StatusEffect {
            id: MANA_DRAIN,
            name: "Mana Drain".into(),
            description: "Reduces current mana each round.".into(),
            kind: StatusKind::ManaDrain,
            base_value: 10,
            default_duration: 2,
        },
    ]
}

fn class_spell(
    id: u32,
    name: &str,
    description: &str,
    class: CharacterClass,
    mana_cost: i32,
    target_type: TargetType,
    casting_time: u32,
    cooldown: u32,
    effects: Vec<SpellEffect>,
) -> Spell {
    Spell {
        id: SpellId::new(id),
        name: name.into(),
        description: description.into(),
        spell_type: SpellType::Class,
        required_class: Some(class),
        required_level: 1,
        mana_cost,
        target_type,
        casting_time,
        cooldown,
        effects,
    }
}

fn damage(base_value: i32, scaling_factor: f32, damage_type: DamageType) -> SpellEffect {
    SpellEffect::DirectDamage {
        base_value,
        scaling_factor,
        damage_type,
    }
}

fn status(status_effect_id: StatusEffectId, chance: u32, duration: u32) -> SpellEffect {
    SpellEffect::ApplyStatusEffect {
        status_effect_id,
        chance,
        duration,
    }
}

/// One starting spell per class.
pub fn all_spells() -> Vec<Spell> {
    vec![
        class_spell(
            1,
            "Glimmering Bolt",
            "A quick bolt of frost energy that deals damage to a single enemy.",
            CharacterClass::AetherWeaver,
            10,
            TargetType::TargetEnemy,
            1,
            0,
            vec![damage(15, 1.5, DamageType::Arcane)],
        ),
        class_spell(
            2,
            "Mend Wounds",
            "A standard, direct healing spell for a single ally.",
            CharacterClass::Dawnkeeper,
            12,
            TargetType::TargetAlly,
            1,
            0,
            vec![SpellEffect::Heal {
                base_value: 20,
                scaling_factor: 1.2,
            }],
        ),
        class_spell(
            3,
            "Shield Bash",
            "Deals minor physical damage and has a chance to stun the target.",
            CharacterClass::Vanguard,
            8,
            TargetType::TargetEnemy,
            0,
            2,
            vec![damage(8, 1.0, DamageType::Physical), status(STUNNED, 25, 1)],
        ),
        class_spell(
            4,
            "Venomous Strike",
            "An instant attack that deals minor physical damage and applies poison.",
            CharacterClass::Shadowblade,
            15,
            TargetType::TargetEnemy,
            0,
            3,
            vec![damage(6, 0.8, DamageType::Physical), status(POISONED, 100, 3)],
        ),
        class_spell(
            5,
            "Short Circuit",
            "Deals minor shock damage and has a chance to apply mana drain.",
            CharacterClass::Technomancer,
            10,
            TargetType::TargetEnemy,
            1,
            2,
            vec![
                damage(12, 1.3, DamageType::Lightning),
                status(MANA_DRAIN, 30, 2),
            ],
        ),
        class_spell(
            6,
            "Ensnaring Vines",
            "Deals no damage but applies a snare effect to prevent fleeing.",
            CharacterClass::GloomWarden,
            12,
            TargetType::TargetEnemy,
            1,
            3,
            vec![status(SNARED, 100, 3)],
        ),
    ]
}
