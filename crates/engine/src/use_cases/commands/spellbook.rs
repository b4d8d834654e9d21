use nightfall_shared::ServerEvent;

use super::{ActingCharacter, CommandContext, CommandError};

pub(super) async fn learn(
    ctx: &CommandContext,
    actor: &ActingCharacter,
    spell_name: Option<String>,
) -> Result<Vec<ServerEvent>, CommandError> {
    let Some(spell_name) = spell_name else {
        return Ok(actor.reply("Usage: learn <spell_name>"));
    };
    let message = ctx.spells.learn(&actor.character, &spell_name).await?;
    Ok(actor.reply(message))
}

pub(super) async fn list(
    ctx: &CommandContext,
    actor: &ActingCharacter,
    available: bool,
) -> Result<Vec<ServerEvent>, CommandError> {
    let message = if available {
        ctx.spells.describe_available(&actor.character).await?
    } else {
        ctx.spells.describe_spellbook(&actor.character).await?
    };
    Ok(actor.reply(message))
}
