//! Experience grants and the leveling loop.

use std::sync::Arc;

use async_trait::async_trait;
use nightfall_domain::{CharacterId, DomainEvent, LevelUp, STAT_POINTS_PER_LEVEL};
use nightfall_shared::ServerEvent;

use crate::infrastructure::event_bus::EventSubscriber;
use crate::infrastructure::ports::{CharacterRepo, RepoError};

pub struct ProgressionService {
    characters: Arc<dyn CharacterRepo>,
}

impl ProgressionService {
    pub fn new(characters: Arc<dyn CharacterRepo>) -> Self {
        Self { characters }
    }

    /// Grant experience and run as many level-ups as it pays for.
    pub async fn grant_experience(
        &self,
        character_id: CharacterId,
        amount: u32,
    ) -> Result<Vec<ServerEvent>, RepoError> {
        let mut character = self
            .characters
            .get(character_id)
            .await?
            .ok_or_else(|| RepoError::not_found("Character", character_id))?;

        let level_ups = character.gain_experience(amount);
        self.characters
            .update_progress(character_id, &character.progress())
            .await?;
        if !level_ups.is_empty() {
            self.characters.update_hp(character_id, character.max_hp).await?;
            self.characters
                .update_mana(character_id, character.max_mana)
                .await?;
        }

        let id = character_id.to_uuid();
        let mut events = vec![ServerEvent::message(id, format!("You gained {} XP.", amount))];
        for level_up in &level_ups {
            tracing::info!(
                character_id = %character_id,
                level = level_up.new_level,
                "Character leveled up"
            );
            events.push(ServerEvent::message(id, level_up_message(level_up)));
        }
        Ok(events)
    }
}

fn level_up_message(level_up: &LevelUp) -> String {
    format!(
        "DING! You are now ready for LEVEL {}! Your Max HP increases to {}. You have gained {} points to assign to your attributes.",
        level_up.new_level, level_up.max_hp, STAT_POINTS_PER_LEVEL
    )
}

#[async_trait]
impl EventSubscriber for ProgressionService {
    fn name(&self) -> &'static str {
        "progression"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<Vec<ServerEvent>, RepoError> {
        match event {
            DomainEvent::MobDefeated {
                mob,
                killer: Some(killer),
                ..
            } if mob.experience_award > 0 => {
                self.grant_experience(*killer, mob.experience_award).await
            }
            DomainEvent::MobDefeated { .. } => Ok(Vec::new()),
        }
    }
}
