//! World-level test context.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use nightfall_domain::{Character, CharacterClass, CharacterId, RoomId};
use nightfall_shared::{CommandEnvelope, GameUpdate, ServerEvent};
use serde_json::{json, Value};

use crate::app::{GameEngine, Repositories};
use crate::content::WorldSeeder;
use crate::infrastructure::clock::{FixedClock, FixedRandom};
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::memory::InMemoryStore;
use crate::test_fixtures::{repositories, RecordingBroadcast};

pub struct WorldContext {
    pub engine: GameEngine,
    pub repos: Repositories,
    pub broadcast: Arc<RecordingBroadcast>,
}

impl WorldContext {
    /// Haven seeded, lowest dice rolls, clock frozen.
    pub async fn setup() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let repos = repositories(store);
        WorldSeeder::new(repos.rooms.clone(), repos.mobs.clone(), repos.items.clone())
            .seed_if_empty()
            .await
            .expect("seed world");

        let broadcast = Arc::new(RecordingBroadcast::new());
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
        let engine = GameEngine::new(
            repos.clone(),
            broadcast.clone(),
            Arc::new(clock),
            Arc::new(FixedRandom::low()),
            &EngineConfig::default(),
        );
        Self {
            engine,
            repos,
            broadcast,
        }
    }

    pub async fn create_character(&self, name: &str, class: CharacterClass, room: &str) -> Character {
        let character = Character::new(name, class, RoomId::new(room));
        self.repos
            .characters
            .save(&character)
            .await
            .expect("save character");
        character
    }

    pub async fn connect(&self, id: CharacterId) -> Vec<ServerEvent> {
        self.engine.handle_connect(id).await.expect("connect")
    }

    pub async fn send(&self, id: CharacterId, action: &str, payload: Value) -> Vec<ServerEvent> {
        self.engine
            .process_command(id, CommandEnvelope::new(action, payload))
            .await
            .expect("command")
    }

    pub async fn say(&self, id: CharacterId, action: &str, text: &str) -> Vec<ServerEvent> {
        self.send(id, action, json!(text)).await
    }

    /// One combat round, as the scheduler would run it.
    pub async fn tick(&self) -> Vec<ServerEvent> {
        self.engine.combat().tick().await;
        self.broadcast.take()
    }

    pub async fn reload(&self, id: CharacterId) -> Character {
        self.repos
            .characters
            .get(id)
            .await
            .expect("load character")
            .expect("character exists")
    }
}

pub fn texts(events: &[ServerEvent]) -> Vec<&str> {
    events.iter().map(ServerEvent::text).collect()
}

pub fn last_update(events: &[ServerEvent]) -> &GameUpdate {
    events
        .iter()
        .rev()
        .find_map(ServerEvent::as_game_update)
        .expect("a game update")
}
