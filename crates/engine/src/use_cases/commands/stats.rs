use nightfall_domain::{CoreStat, StatAllocationError};
use nightfall_shared::ServerEvent;
use serde_json::Value;

use super::{ActingCharacter, CommandContext, CommandError};

/// `{ "strength": 1, "wisdom": 1 }` into validated pairs. Any key outside
/// the six core stats, or a non-integer value, rejects the whole request.
fn parse_allocation(payload: &Value) -> Option<Vec<(CoreStat, u32)>> {
    let object = payload.as_object()?;
    object
        .iter()
        .map(|(key, value)| {
            let stat = key.parse::<CoreStat>().ok()?;
            let points = u32::try_from(value.as_u64()?).ok()?;
            Some((stat, points))
        })
        .collect()
}

pub(super) async fn assign(
    ctx: &CommandContext,
    actor: &ActingCharacter,
    payload: &Value,
) -> Result<Vec<ServerEvent>, CommandError> {
    let Some(allocation) = parse_allocation(payload) else {
        return Ok(actor.reply("Invalid stat assignment format."));
    };

    // Fresh row: hp may have ticked since the actor was loaded.
    let mut character = ctx
        .repos
        .characters
        .get(actor.id())
        .await?
        .ok_or(CommandError::CharacterNotFound(actor.id()))?;
    match character.assign_stats(&allocation) {
        Ok(spent) => {
            ctx.repos
                .characters
                .update_stats(character.id, &character.stats, character.unspent_stat_points)
                .await?;
            tracing::debug!(character_id = %character.id, spent, "Stat points assigned");
            Ok(vec![
                ctx.full_update(character.id, &actor.room.id, "You have grown stronger!")
                    .await?,
            ])
        }
        Err(StatAllocationError::Empty) => Ok(actor.reply("No points assigned.")),
        Err(StatAllocationError::InsufficientPoints { .. }) => {
            Ok(actor.reply("You don't have enough stat points."))
        }
    }
}
