//! `look` and `move`.

use nightfall_shared::ServerEvent;

use super::{ActingCharacter, CommandContext, CommandError};

pub(super) async fn look(
    ctx: &CommandContext,
    actor: &ActingCharacter,
) -> Result<Vec<ServerEvent>, CommandError> {
    Ok(vec![
        ctx.full_update(actor.id(), &actor.room.id, "You look around.")
            .await?,
    ])
}

/// Leaving a room drops the character from its fight; arriving runs the
/// aggression check for the new room.
pub(super) async fn go(
    ctx: &CommandContext,
    actor: &ActingCharacter,
    direction: Option<String>,
) -> Result<Vec<ServerEvent>, CommandError> {
    let Some(direction) = direction.map(|d| d.to_lowercase()) else {
        return Ok(actor.reply("You can't go that way."));
    };
    let Some(destination) = actor.room.exit(&direction).cloned() else {
        return Ok(actor.reply("You can't go that way."));
    };

    let id = actor.id();
    let uuid = id.to_uuid();
    let name = &actor.character.name;

    ctx.combat.remove_character_from_combat(id).await;
    ctx.repos.characters.update_room(id, &destination).await?;
    tracing::debug!(character_id = %id, from = %actor.room.id, to = %destination, "Character moved");

    let mut moved = actor.character.clone();
    moved.room_id = destination.clone();
    let aggression = ctx.combat.check_for_aggression(&moved).await?;

    let mut events = vec![
        ServerEvent::room_message(
            actor.room.id.as_str(),
            format!("{} moves {}.", name, direction),
            vec![uuid],
        ),
        ctx.full_update(id, &destination, format!("You move {}.", direction))
            .await?,
        ServerEvent::room_message(
            destination.as_str(),
            format!("{} arrives.", name),
            vec![uuid],
        ),
    ];
    events.extend(aggression);
    Ok(events)
}
