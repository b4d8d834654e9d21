use nightfall_shared::ServerEvent;

use super::ActingCharacter;

pub(super) fn say(actor: &ActingCharacter, message: Option<String>) -> Vec<ServerEvent> {
    let Some(message) = message else {
        return actor.reply("Say what?");
    };
    vec![
        ServerEvent::message(actor.id().to_uuid(), format!("You say, '{}'", message)),
        ServerEvent::room_message(
            actor.room.id.as_str(),
            format!("{} says, '{}'", actor.character.name, message),
            vec![actor.id().to_uuid()],
        ),
    ]
}
