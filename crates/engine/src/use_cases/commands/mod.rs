//! Command dispatch.
//!
//! Inbound envelopes are parsed into the closed [`GameCommand`] enum and
//! matched onto one handler per verb. Handlers never fail for bad player
//! input; they answer with a message event instead. A [`CommandError`]
//! means the request itself could not be served (missing rows, store I/O).

mod attack;
mod cast;
mod items;
mod movement;
mod social;
mod spellbook;
mod stats;

use std::sync::Arc;

use nightfall_domain::{Character, CharacterId, Item, Room, RoomId};
use nightfall_shared::{CommandEnvelope, ServerEvent};
use serde_json::Value;
use thiserror::Error;

use crate::app::Repositories;
use crate::infrastructure::ports::RepoError;
use crate::use_cases::combat::{CombatError, CombatManager};
use crate::use_cases::snapshot::{SnapshotBuilder, SnapshotError};
use crate::use_cases::spells::{SpellEffectResolver, SpellError, SpellService};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),
    #[error("Room not found: {0}")]
    RoomNotFound(RoomId),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
    #[error("Spell error: {0}")]
    Spell(SpellError),
}

impl From<SnapshotError> for CommandError {
    fn from(err: SnapshotError) -> Self {
        match err {
            SnapshotError::CharacterNotFound(id) => CommandError::CharacterNotFound(id),
            SnapshotError::RoomNotFound(id) => CommandError::RoomNotFound(id),
            SnapshotError::Repo(e) => CommandError::Repo(e),
        }
    }
}

impl From<CombatError> for CommandError {
    fn from(err: CombatError) -> Self {
        match err {
            CombatError::Repo(e) => CommandError::Repo(e),
        }
    }
}

impl From<SpellError> for CommandError {
    fn from(err: SpellError) -> Self {
        match err {
            SpellError::Repo(e) => CommandError::Repo(e),
            other => CommandError::Spell(other),
        }
    }
}

/// Every verb the engine understands.
#[derive(Debug, Clone, PartialEq)]
pub enum GameCommand {
    Look,
    Move { direction: Option<String> },
    Say { message: Option<String> },
    Inventory,
    Get { item: Option<String> },
    Drop { item: Option<String> },
    Examine { item: Option<String> },
    Attack { target: Option<String> },
    AssignStats { allocation: Value },
    Equip { item: Option<String> },
    Unequip { item: Option<String> },
    Cast { spell_name: Option<String>, target: Option<String> },
    Learn { spell_name: Option<String> },
    Spells { available: bool },
}

impl GameCommand {
    /// `None` for verbs the engine does not know.
    pub fn parse(envelope: &CommandEnvelope) -> Option<Self> {
        let text = || envelope.text().map(str::to_string);
        let command = match envelope.action.as_str() {
            "look" => GameCommand::Look,
            "move" => GameCommand::Move { direction: text() },
            "say" => GameCommand::Say { message: text() },
            "inventory" | "i" => GameCommand::Inventory,
            "get" => GameCommand::Get { item: text() },
            "drop" => GameCommand::Drop { item: text() },
            "examine" => GameCommand::Examine { item: text() },
            "attack" => GameCommand::Attack { target: text() },
            "assignStats" => GameCommand::AssignStats {
                allocation: envelope.payload.clone(),
            },
            "equip" => GameCommand::Equip { item: text() },
            "unequip" => GameCommand::Unequip { item: text() },
            "cast" => GameCommand::Cast {
                spell_name: field(&envelope.payload, &["spellName"]),
                target: field(&envelope.payload, &["target", "targetId"]),
            },
            "learn" => GameCommand::Learn {
                spell_name: field(&envelope.payload, &["spellName"]).or_else(text),
            },
            "spells" => GameCommand::Spells {
                available: field(&envelope.payload, &["type"]).as_deref() == Some("available")
                    || envelope.payload.as_str() == Some("available"),
            },
            _ => return None,
        };
        Some(command)
    }
}

fn field(payload: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// The acting character with its room and inventory loaded.
#[derive(Debug, Clone)]
pub struct ActingCharacter {
    pub character: Character,
    pub room: Room,
    pub inventory: Vec<Item>,
}

impl ActingCharacter {
    pub async fn load(repos: &Repositories, id: CharacterId) -> Result<Self, CommandError> {
        let character = repos
            .characters
            .get(id)
            .await?
            .ok_or(CommandError::CharacterNotFound(id))?;
        let room = repos
            .rooms
            .get(&character.room_id)
            .await?
            .ok_or_else(|| CommandError::RoomNotFound(character.room_id.clone()))?;
        let inventory = repos.items.list_for_character(id).await?;
        Ok(Self {
            character,
            room,
            inventory,
        })
    }

    pub fn id(&self) -> CharacterId {
        self.character.id
    }

    /// A private message to the actor.
    pub fn reply(&self, message: impl Into<String>) -> Vec<ServerEvent> {
        vec![ServerEvent::message(self.character.id.to_uuid(), message)]
    }
}

/// Everything a handler may touch.
pub struct CommandContext {
    pub repos: Repositories,
    pub combat: Arc<CombatManager>,
    pub spells: SpellService,
    pub effects: SpellEffectResolver,
    pub snapshots: SnapshotBuilder,
}

impl CommandContext {
    /// Full state snapshot for a character standing in `room_id`.
    pub async fn full_update(
        &self,
        character_id: CharacterId,
        room_id: &RoomId,
        message: impl Into<String>,
    ) -> Result<ServerEvent, CommandError> {
        let view = self.combat.combat_view(room_id, character_id).await;
        Ok(self.snapshots.build(character_id, message, &view).await?)
    }

    pub async fn execute(
        &self,
        actor: &ActingCharacter,
        command: GameCommand,
    ) -> Result<Vec<ServerEvent>, CommandError> {
        tracing::debug!(character_id = %actor.id(), command = ?command, "Dispatching command");
        match command {
            GameCommand::Look => movement::look(self, actor).await,
            GameCommand::Move { direction } => movement::go(self, actor, direction).await,
            GameCommand::Say { message } => Ok(social::say(actor, message)),
            GameCommand::Inventory => Ok(items::inventory(actor)),
            GameCommand::Get { item } => items::get(self, actor, item).await,
            GameCommand::Drop { item } => items::drop(self, actor, item).await,
            GameCommand::Examine { item } => items::examine(self, actor, item).await,
            GameCommand::Equip { item } => items::equip(self, actor, item).await,
            GameCommand::Unequip { item } => items::unequip(self, actor, item).await,
            GameCommand::Attack { target } => attack::attack(self, actor, target).await,
            GameCommand::AssignStats { allocation } => {
                stats::assign(self, actor, &allocation).await
            }
            GameCommand::Cast { spell_name, target } => {
                cast::cast(self, actor, spell_name, target).await
            }
            GameCommand::Learn { spell_name } => spellbook::learn(self, actor, spell_name).await,
            GameCommand::Spells { available } => spellbook::list(self, actor, available).await,
        }
    }
}
