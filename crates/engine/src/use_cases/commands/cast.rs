use nightfall_domain::{Character, EffectiveStats, Mob, Spell, TargetType};
use nightfall_shared::ServerEvent;

use super::attack::{find_mob, friendly_refusal};
use super::{ActingCharacter, CommandContext, CommandError};
use crate::use_cases::attributes::AttributeService;
use crate::use_cases::combat::CombatantId;
use crate::use_cases::spells::{EffectOutcome, SpellError};

enum CastTarget {
    Character(Character),
    Mob(Mob),
}

impl CastTarget {
    fn combatant(&self) -> CombatantId {
        match self {
            CastTarget::Character(c) => c.id.into(),
            CastTarget::Mob(m) => m.id.into(),
        }
    }
}

pub(super) async fn cast(
    ctx: &CommandContext,
    actor: &ActingCharacter,
    spell_name: Option<String>,
    target: Option<String>,
) -> Result<Vec<ServerEvent>, CommandError> {
    let Some(spell_name) = spell_name else {
        return Ok(actor.reply("Usage: cast <spell_name> [target]"));
    };
    let spell = match ctx.spells.check_castable(&actor.character, &spell_name).await? {
        Ok(spell) => spell,
        Err(refusal) => return Ok(actor.reply(refusal.message(&spell_name))),
    };

    let target = match resolve_target(ctx, actor, &spell, target.as_deref()).await? {
        Ok(target) => target,
        Err(refusal) => return Ok(refusal),
    };

    let mut caster = actor.character.clone();
    caster.spend_mana(spell.mana_cost);
    ctx.repos.characters.update_mana(caster.id, caster.mana).await?;
    ctx.spells.start_cooldown(&caster, &spell).await?;

    if ctx.combat.is_in_combat(caster.id).await {
        ctx.combat.queue_spell(&caster, &spell, target.combatant()).await;
        let message = if spell.casting_time == 0 {
            format!("You cast {}!", spell.name)
        } else {
            format!("You begin casting {}...", spell.name)
        };
        return Ok(actor.reply(message));
    }

    resolve_now(ctx, actor, &caster, &spell, target).await
}

/// `Err` carries the refusal to send back.
async fn resolve_target(
    ctx: &CommandContext,
    actor: &ActingCharacter,
    spell: &Spell,
    target: Option<&str>,
) -> Result<Result<CastTarget, Vec<ServerEvent>>, CommandError> {
    match spell.target_type {
        TargetType::Caster => Ok(Ok(CastTarget::Character(actor.character.clone()))),
        TargetType::TargetEnemy => {
            let Some(keyword) = target else {
                return Ok(Err(actor.reply(format!(
                    "You need to specify a target for \"{}\".",
                    spell.name
                ))));
            };
            if let Some(mob) = find_mob(ctx, actor, keyword).await? {
                if mob.is_friendly() {
                    return Ok(Err(friendly_refusal(actor, &mob)));
                }
                return Ok(Ok(CastTarget::Mob(mob)));
            }
            if find_character(ctx, actor, keyword).await?.is_some() {
                return Ok(Err(actor.reply(format!(
                    "You can only target enemies with \"{}\".",
                    spell.name
                ))));
            }
            Ok(Err(actor.reply("Target not found.")))
        }
        TargetType::TargetAlly => {
            let Some(keyword) = target else {
                return Ok(Ok(CastTarget::Character(actor.character.clone())));
            };
            if let Some(ally) = find_character(ctx, actor, keyword).await? {
                return Ok(Ok(CastTarget::Character(ally)));
            }
            if find_mob(ctx, actor, keyword).await?.is_some() {
                return Ok(Err(actor.reply(format!(
                    "You can only target allies with \"{}\".",
                    spell.name
                ))));
            }
            Ok(Err(actor.reply("Target not found.")))
        }
    }
}

/// Matches by case-insensitive name or by id, the caster included.
async fn find_character(
    ctx: &CommandContext,
    actor: &ActingCharacter,
    needle: &str,
) -> Result<Option<Character>, CommandError> {
    let matches = |c: &Character| {
        c.name.eq_ignore_ascii_case(needle) || c.id.to_string() == needle
    };
    if matches(&actor.character) {
        return Ok(Some(actor.character.clone()));
    }
    let others = ctx
        .repos
        .characters
        .list_in_room(&actor.room.id, Some(actor.id()))
        .await?;
    Ok(others.into_iter().find(|c| matches(c)))
}

/// Out-of-combat casts land immediately.
async fn resolve_now(
    ctx: &CommandContext,
    actor: &ActingCharacter,
    caster: &Character,
    spell: &Spell,
    target: CastTarget,
) -> Result<Vec<ServerEvent>, CommandError> {
    let caster_stats = AttributeService::for_character(caster, &actor.inventory);
    let room = actor.room.id.as_str();

    match target {
        CastTarget::Character(mut target) => {
            let inventory = if target.id == caster.id {
                actor.inventory.clone()
            } else {
                ctx.repos.items.list_for_character(target.id).await?
            };
            let mut target_stats = AttributeService::for_character(&target, &inventory);
            let outcome = match resolve(ctx, spell, &caster_stats, &mut target_stats) {
                Ok(outcome) => outcome,
                Err(fizzle) => return Ok(fizzle.into_events(actor)),
            };
            target.set_hp(target_stats.hp);
            ctx.repos.characters.update_hp(target.id, target.hp).await?;

            let mut events = room_messages(room, outcome);
            events.push(ctx.full_update(caster.id, &actor.room.id, "").await?);
            if target.id != caster.id {
                events.push(ctx.full_update(target.id, &actor.room.id, "").await?);
            }
            Ok(events)
        }
        CastTarget::Mob(mut mob) => {
            let mut target_stats = AttributeService::for_mob(&mob);
            let outcome = match resolve(ctx, spell, &caster_stats, &mut target_stats) {
                Ok(outcome) => outcome,
                Err(fizzle) => return Ok(fizzle.into_events(actor)),
            };
            let damaged = outcome.damage_dealt > 0;
            mob.set_hp(target_stats.hp);
            let mut events = room_messages(room, outcome);

            if !mob.is_alive() {
                events.extend(ctx.combat.settle_spell_kill(mob, caster.id).await?);
            } else {
                ctx.repos.mobs.update_hp(mob.id, mob.hp).await?;
                if damaged && !mob.is_friendly() {
                    events.push(ctx.combat.engage(caster, &mob).await);
                }
            }
            events.push(ctx.full_update(caster.id, &actor.room.id, "").await?);
            Ok(events)
        }
    }
}

struct Fizzle {
    caster: String,
}

impl Fizzle {
    fn into_events(self, actor: &ActingCharacter) -> Vec<ServerEvent> {
        vec![ServerEvent::room_message(
            actor.room.id.as_str(),
            format!("{}'s spell fizzles.", self.caster),
            Vec::new(),
        )]
    }
}

fn resolve(
    ctx: &CommandContext,
    spell: &Spell,
    caster: &EffectiveStats,
    target: &mut EffectiveStats,
) -> Result<EffectOutcome, Fizzle> {
    ctx.effects.resolve(spell, caster, target).map_err(|err: SpellError| {
        tracing::warn!(spell = %spell.name, error = %err, "Spell fizzled");
        Fizzle {
            caster: caster.name.clone(),
        }
    })
}

fn room_messages(room: &str, outcome: EffectOutcome) -> Vec<ServerEvent> {
    outcome
        .messages
        .into_iter()
        .map(|message| ServerEvent::room_message(room, message, Vec::new()))
        .collect()
}
