//! Application composition.
//!
//! [`Repositories`] bundles the store ports; [`GameEngine`] wires every use
//! case around them and is the single entry point the transport talks to.

use std::sync::Arc;

use dashmap::DashMap;
use nightfall_domain::CharacterId;
use nightfall_shared::{CommandEnvelope, ServerEvent};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::event_bus::EventBus;
use crate::infrastructure::ports::{
    BroadcastPort, CharacterRepo, ClockPort, ContentRepo, ItemRepo, MobRepo, RandomPort,
    RepoError, RoomRepo, SpellBookRepo,
};
use crate::use_cases::combat::CombatManager;
use crate::use_cases::commands::{ActingCharacter, CommandContext, CommandError, GameCommand};
use crate::use_cases::death::DeathService;
use crate::use_cases::loot::LootService;
use crate::use_cases::progression::ProgressionService;
use crate::use_cases::snapshot::SnapshotBuilder;
use crate::use_cases::spells::{SpellEffectResolver, SpellService};

/// Store handle: one port per record kind plus the content catalog.
#[derive(Clone)]
pub struct Repositories {
    pub characters: Arc<dyn CharacterRepo>,
    pub mobs: Arc<dyn MobRepo>,
    pub items: Arc<dyn ItemRepo>,
    pub rooms: Arc<dyn RoomRepo>,
    pub spellbook: Arc<dyn SpellBookRepo>,
    pub content: Arc<dyn ContentRepo>,
}

impl Repositories {
    /// Every store port served by one backing store.
    pub fn from_store<S>(store: Arc<S>, content: Arc<dyn ContentRepo>) -> Self
    where
        S: CharacterRepo + MobRepo + ItemRepo + RoomRepo + SpellBookRepo + 'static,
    {
        Self {
            characters: store.clone(),
            mobs: store.clone(),
            items: store.clone(),
            rooms: store.clone(),
            spellbook: store,
            content,
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Facade over the whole simulation.
pub struct GameEngine {
    repos: Repositories,
    combat: Arc<CombatManager>,
    commands: CommandContext,
    /// One lock per character so a character's commands never interleave.
    command_locks: DashMap<CharacterId, Arc<Mutex<()>>>,
}

impl GameEngine {
    pub fn new(
        repos: Repositories,
        broadcast: Arc<dyn BroadcastPort>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        config: &EngineConfig,
    ) -> Self {
        let loot = LootService::new(
            repos.items.clone(),
            repos.characters.clone(),
            repos.content.clone(),
            random.clone(),
        );
        let progression = ProgressionService::new(repos.characters.clone());
        let events = EventBus::new()
            .with_subscriber(Arc::new(loot))
            .with_subscriber(Arc::new(progression));

        let death = DeathService::new(
            repos.characters.clone(),
            repos.rooms.clone(),
            config.respawn_room.clone(),
            config.death_penalty_percent,
        );
        let combat = Arc::new(CombatManager::new(
            repos.clone(),
            random.clone(),
            events,
            death,
            SnapshotBuilder::new(repos.clone(), config.zone_radius),
            broadcast,
            config.combat_tick,
        ));

        let commands = CommandContext {
            repos: repos.clone(),
            combat: combat.clone(),
            spells: SpellService::new(
                repos.content.clone(),
                repos.spellbook.clone(),
                clock,
                config.combat_tick,
            ),
            effects: SpellEffectResolver::new(repos.content.clone(), random),
            snapshots: SnapshotBuilder::new(repos.clone(), config.zone_radius),
        };

        Self {
            repos,
            combat,
            commands,
            command_locks: DashMap::new(),
        }
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    pub fn combat(&self) -> &Arc<CombatManager> {
        &self.combat
    }

    pub fn spawn_combat_scheduler(&self) -> JoinHandle<()> {
        self.combat.clone().spawn_scheduler()
    }

    fn lock_for(&self, character_id: CharacterId) -> Arc<Mutex<()>> {
        self.command_locks
            .entry(character_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Route one inbound command. Bad input comes back as message events.
    pub async fn process_command(
        &self,
        character_id: CharacterId,
        envelope: CommandEnvelope,
    ) -> Result<Vec<ServerEvent>, EngineError> {
        let lock = self.lock_for(character_id);
        let _guard = lock.lock().await;

        let Some(command) = GameCommand::parse(&envelope) else {
            tracing::debug!(character_id = %character_id, action = %envelope.action, "Unknown command");
            return Ok(vec![ServerEvent::message(
                character_id.to_uuid(),
                "Unknown command.",
            )]);
        };
        let actor = ActingCharacter::load(&self.repos, character_id).await?;
        Ok(self.commands.execute(&actor, command).await?)
    }

    /// A character's connection came up.
    pub async fn handle_connect(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<ServerEvent>, EngineError> {
        let lock = self.lock_for(character_id);
        let _guard = lock.lock().await;

        let actor = ActingCharacter::load(&self.repos, character_id).await?;
        let name = &actor.character.name;
        tracing::info!(character_id = %character_id, name = %name, "Character connected");

        let mut events = vec![ServerEvent::room_message(
            actor.room.id.as_str(),
            format!("{} has connected.", name),
            vec![character_id.to_uuid()],
        )];
        let aggression = self
            .combat
            .check_for_aggression(&actor.character)
            .await
            .map_err(CommandError::from)?;
        events.push(
            self.commands
                .full_update(character_id, &actor.room.id, format!("Welcome back, {}!", name))
                .await?,
        );
        events.extend(aggression);
        Ok(events)
    }

    /// A character's connection went away.
    pub async fn handle_disconnect(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<ServerEvent>, EngineError> {
        self.combat.remove_character_from_combat(character_id).await;
        self.command_locks.remove(&character_id);

        let Some(character) = self.repos.characters.get(character_id).await? else {
            return Ok(Vec::new());
        };
        tracing::info!(character_id = %character_id, name = %character.name, "Character disconnected");
        Ok(vec![ServerEvent::room_message(
            character.room_id.as_str(),
            format!("{} has disconnected.", character.name),
            vec![character_id.to_uuid()],
        )])
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use nightfall_domain::CharacterClass;
    use serde_json::json;

    use super::*;
    use crate::e2e_tests::WorldContext;

    #[tokio::test]
    async fn connect_waits_for_a_command_in_flight() {
        let world = WorldContext::setup().await;
        let aria = world
            .create_character("Aria", CharacterClass::Vanguard, "town-square")
            .await;

        let lock = world.engine.lock_for(aria.id);
        let guard = lock.lock().await;
        let blocked = tokio::time::timeout(Duration::from_millis(50), world.connect(aria.id)).await;
        assert!(blocked.is_err());

        drop(guard);
        let events = world.connect(aria.id).await;
        assert!(events.iter().any(|e| e.text() == "Welcome back, Aria!"));
    }

    #[tokio::test]
    async fn stat_assignment_keeps_hp_lost_after_the_actor_was_loaded() {
        let world = WorldContext::setup().await;
        let mut aria = world
            .create_character("Aria", CharacterClass::Vanguard, "town-square")
            .await;
        aria.unspent_stat_points = 2;
        world.repos.characters.save(&aria).await.unwrap();

        let stale = ActingCharacter::load(&world.repos, aria.id).await.unwrap();
        world.repos.characters.update_hp(aria.id, 40).await.unwrap();

        world
            .engine
            .commands
            .execute(
                &stale,
                GameCommand::AssignStats {
                    allocation: json!({"strength": 2}),
                },
            )
            .await
            .unwrap();

        let after = world.reload(aria.id).await;
        assert_eq!(after.hp, 40);
        assert_eq!(after.stats.strength, aria.stats.strength + 2);
        assert_eq!(after.unspent_stat_points, 0);
    }
}
