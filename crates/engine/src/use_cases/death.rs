//! Death and respawn.

use std::sync::Arc;

use nightfall_domain::{CharacterId, RoomId};
use nightfall_shared::ServerEvent;

use crate::infrastructure::ports::{CharacterRepo, RepoError, RoomRepo};

/// Applies the experience penalty, restores hp and relocates to the safe room.
pub struct DeathService {
    characters: Arc<dyn CharacterRepo>,
    rooms: Arc<dyn RoomRepo>,
    respawn_room: RoomId,
    penalty_percent: u32,
}

impl DeathService {
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        rooms: Arc<dyn RoomRepo>,
        respawn_room: RoomId,
        penalty_percent: u32,
    ) -> Self {
        Self {
            characters,
            rooms,
            respawn_room,
            penalty_percent,
        }
    }

    pub async fn handle_death(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<ServerEvent>, RepoError> {
        let mut character = self
            .characters
            .get(character_id)
            .await?
            .ok_or_else(|| RepoError::not_found("Character", character_id))?;

        let outcome = character.die(self.penalty_percent, self.respawn_room.clone());
        self.characters
            .update_progress(character_id, &character.progress())
            .await?;
        self.characters.update_hp(character_id, character.hp).await?;
        self.characters
            .update_room(character_id, &self.respawn_room)
            .await?;

        let place = match self.rooms.get(&self.respawn_room).await? {
            Some(room) => room.name,
            None => self.respawn_room.to_string(),
        };

        tracing::info!(
            character_id = %character_id,
            experience_lost = outcome.experience_lost,
            respawn_room = %self.respawn_room,
            "Character died"
        );

        let id = character_id.to_uuid();
        Ok(vec![
            ServerEvent::message(
                id,
                format!("You have died and lost {} XP.", outcome.experience_lost),
            ),
            ServerEvent::message(id, format!("You have been resurrected in {}.", place)),
        ])
    }
}
