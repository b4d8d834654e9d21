//! Item verbs: inventory, get, drop, examine, equip, unequip.

use nightfall_domain::Item;
use nightfall_shared::ServerEvent;

use super::{ActingCharacter, CommandContext, CommandError};

pub(super) fn inventory(actor: &ActingCharacter) -> Vec<ServerEvent> {
    if actor.inventory.is_empty() {
        return actor.reply("You are not carrying anything.");
    }
    let lines: Vec<String> = actor
        .inventory
        .iter()
        .map(|item| format!("  - {}", item.name))
        .collect();
    actor.reply(format!("You are carrying:\n{}", lines.join("\n")))
}

fn carried<'a>(actor: &'a ActingCharacter, name: &str) -> Option<&'a Item> {
    actor.inventory.iter().find(|item| item.matches_name(name))
}

pub(super) async fn get(
    ctx: &CommandContext,
    actor: &ActingCharacter,
    name: Option<String>,
) -> Result<Vec<ServerEvent>, CommandError> {
    let floor = ctx.repos.items.list_in_room(&actor.room.id).await?;
    let Some(item) = name
        .as_deref()
        .and_then(|name| floor.iter().find(|item| item.matches_name(name)))
    else {
        return Ok(actor.reply("You don't see that here."));
    };

    ctx.repos.items.move_to_character(item.id, actor.id()).await?;
    Ok(vec![
        ctx.full_update(actor.id(), &actor.room.id, format!("You take the {}.", item.name))
            .await?,
        ServerEvent::room_message(
            actor.room.id.as_str(),
            format!("{} takes the {}.", actor.character.name, item.name),
            vec![actor.id().to_uuid()],
        ),
    ])
}

pub(super) async fn drop(
    ctx: &CommandContext,
    actor: &ActingCharacter,
    name: Option<String>,
) -> Result<Vec<ServerEvent>, CommandError> {
    let Some(item) = name.as_deref().and_then(|name| carried(actor, name)) else {
        return Ok(actor.reply("You aren't carrying that."));
    };

    ctx.repos.items.move_to_room(item.id, &actor.room.id).await?;
    Ok(vec![
        ctx.full_update(actor.id(), &actor.room.id, format!("You drop the {}.", item.name))
            .await?,
        ServerEvent::room_message(
            actor.room.id.as_str(),
            format!("{} drops a {}.", actor.character.name, item.name),
            vec![actor.id().to_uuid()],
        ),
    ])
}

/// Looks in the backpack first, then on the floor.
pub(super) async fn examine(
    ctx: &CommandContext,
    actor: &ActingCharacter,
    name: Option<String>,
) -> Result<Vec<ServerEvent>, CommandError> {
    let Some(name) = name else {
        return Ok(actor.reply("Examine what?"));
    };
    if let Some(item) = carried(actor, &name) {
        return Ok(actor.reply(item.description.clone()));
    }
    let floor = ctx.repos.items.list_in_room(&actor.room.id).await?;
    Ok(match floor.iter().find(|item| item.matches_name(&name)) {
        Some(item) => actor.reply(item.description.clone()),
        None => actor.reply("You don't see that here."),
    })
}

pub(super) async fn equip(
    ctx: &CommandContext,
    actor: &ActingCharacter,
    name: Option<String>,
) -> Result<Vec<ServerEvent>, CommandError> {
    let Some(item) = name.as_deref().and_then(|name| {
        actor
            .inventory
            .iter()
            .find(|item| !item.equipped && item.matches_name(name))
    }) else {
        return Ok(actor.reply("You don't have that in your backpack."));
    };
    if !item.slot.is_equippable() {
        return Ok(actor.reply("You can't equip that."));
    }
    if let Some(occupant) = actor
        .inventory
        .iter()
        .find(|other| other.equipped && other.slot == item.slot)
    {
        return Ok(actor.reply(format!(
            "You already have a {} equipped in that slot.",
            occupant.name
        )));
    }

    ctx.repos.items.set_equipped(item.id, true).await?;
    Ok(vec![
        ctx.full_update(actor.id(), &actor.room.id, format!("You equip the {}.", item.name))
            .await?,
    ])
}

pub(super) async fn unequip(
    ctx: &CommandContext,
    actor: &ActingCharacter,
    name: Option<String>,
) -> Result<Vec<ServerEvent>, CommandError> {
    let Some(item) = name.as_deref().and_then(|name| {
        actor
            .inventory
            .iter()
            .find(|item| item.equipped && item.matches_name(name))
    }) else {
        return Ok(actor.reply("You don't have that equipped."));
    };

    ctx.repos.items.set_equipped(item.id, false).await?;
    Ok(vec![
        ctx.full_update(
            actor.id(),
            &actor.room.id,
            format!("You unequip the {}.", item.name),
        )
        .await?,
    ])
}
