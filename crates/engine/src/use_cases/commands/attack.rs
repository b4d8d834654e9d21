use nightfall_domain::Mob;
use nightfall_shared::ServerEvent;

use super::{ActingCharacter, CommandContext, CommandError};

/// Mob in the actor's room answering to `keyword`.
pub(super) async fn find_mob(
    ctx: &CommandContext,
    actor: &ActingCharacter,
    keyword: &str,
) -> Result<Option<Mob>, CommandError> {
    let mobs = ctx.repos.mobs.list_in_room(&actor.room.id).await?;
    Ok(mobs
        .into_iter()
        .find(|mob| mob.is_alive() && mob.matches_keyword(keyword)))
}

pub(super) fn friendly_refusal(actor: &ActingCharacter, mob: &Mob) -> Vec<ServerEvent> {
    actor.reply(format!("You can't attack the friendly {}.", mob.name))
}

/// Only queues the swing; damage lands on the next combat tick.
pub(super) async fn attack(
    ctx: &CommandContext,
    actor: &ActingCharacter,
    target: Option<String>,
) -> Result<Vec<ServerEvent>, CommandError> {
    let Some(keyword) = target else {
        return Ok(actor.reply("Attack what?"));
    };
    let Some(mob) = find_mob(ctx, actor, &keyword).await? else {
        return Ok(actor.reply("You don't see that here."));
    };
    if mob.is_friendly() {
        return Ok(friendly_refusal(actor, &mob));
    }

    ctx.combat.queue_attack(&actor.character, &mob).await;
    Ok(actor.reply(format!("You ready your attack on the {}...", mob.name)))
}
