//! Loot resolution when a mob is defeated.
//!
//! Each loot group rolls independently. Template entries copy a static
//! item; generate entries go through [`ItemGenerator`]. Every dropped item
//! lands on the floor of the room the mob died in.

mod item_generator;

pub use item_generator::ItemGenerator;

use std::sync::Arc;

use async_trait::async_trait;
use nightfall_domain::{
    gold_range, BaseItemId, CharacterId, DomainEvent, Item, ItemLocation, ItemTemplateId,
    LootDrop, LootGroup, Mob, RoomId,
};
use nightfall_shared::ServerEvent;
use thiserror::Error;

use crate::infrastructure::event_bus::EventSubscriber;
use crate::infrastructure::ports::{CharacterRepo, ContentRepo, ItemRepo, RandomPort, RepoError};

#[derive(Debug, Error)]
pub enum LootError {
    #[error("Unknown item template: {0}")]
    UnknownTemplate(ItemTemplateId),
    #[error("Unknown base item: {0}")]
    UnknownBaseItem(BaseItemId),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub struct LootService {
    items: Arc<dyn ItemRepo>,
    characters: Arc<dyn CharacterRepo>,
    content: Arc<dyn ContentRepo>,
    random: Arc<dyn RandomPort>,
    generator: ItemGenerator,
}

impl LootService {
    pub fn new(
        items: Arc<dyn ItemRepo>,
        characters: Arc<dyn CharacterRepo>,
        content: Arc<dyn ContentRepo>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let generator = ItemGenerator::new(content.clone(), random.clone());
        Self {
            items,
            characters,
            content,
            random,
            generator,
        }
    }

    /// Roll the mob's loot table and gold, persisting whatever drops.
    pub async fn drop_loot(
        &self,
        mob: &Mob,
        killer: Option<CharacterId>,
        room_id: &RoomId,
    ) -> Result<Vec<ServerEvent>, LootError> {
        let mut dropped = Vec::new();
        for group in mob.loot_table.groups() {
            if !group.drops_on(self.random.gen_f64()) {
                continue;
            }
            for item in self.roll_group(group, room_id)? {
                self.items.create(&item).await?;
                dropped.push(item.name);
            }
        }

        let mut events = Vec::new();
        if !dropped.is_empty() {
            tracing::debug!(mob = %mob.name, count = dropped.len(), "Loot dropped");
            events.push(ServerEvent::room_message(
                room_id.as_str(),
                format!("The {} drops: {}.", mob.name, dropped.join(", ")),
                Vec::new(),
            ));
        }

        if let Some(killer) = killer {
            if let Some(event) = self.award_gold(mob, killer).await? {
                events.push(event);
            }
        }
        Ok(events)
    }

    fn roll_group(&self, group: &LootGroup, room_id: &RoomId) -> Result<Vec<Item>, LootError> {
        let total = group.total_weight();
        if total == 0 {
            return Ok(Vec::new());
        }

        let mut items = Vec::new();
        for _ in 0..group.max_drops {
            let roll = self.random.gen_range(0, total as i32 - 1).max(0) as u32;
            let Some(entry) = group.pick(roll) else {
                continue;
            };
            let location = ItemLocation::Room(room_id.clone());
            match self.materialize(&entry.drop, location) {
                Ok(mut batch) => items.append(&mut batch),
                Err(LootError::Repo(e)) => return Err(LootError::Repo(e)),
                Err(e) => {
                    tracing::warn!(group = %group.group_name, error = %e, "Skipping loot entry")
                }
            }
        }
        Ok(items)
    }

    fn materialize(&self, drop: &LootDrop, location: ItemLocation) -> Result<Vec<Item>, LootError> {
        match drop {
            LootDrop::Template {
                template_id,
                quantity,
            } => {
                let template = self
                    .content
                    .item_template(*template_id)
                    .ok_or(LootError::UnknownTemplate(*template_id))?;
                let count = quantity
                    .resolve(|sides| self.random.gen_range(1, sides as i32).max(1) as u32);
                Ok((0..count)
                    .map(|_| Item::from_template(&template, location.clone()))
                    .collect())
            }
            LootDrop::Generate {
                base_item_id,
                item_level,
            } => Ok(vec![self
                .generator
                .generate(*base_item_id, *item_level, location)?]),
        }
    }

    async fn award_gold(
        &self,
        mob: &Mob,
        killer: CharacterId,
    ) -> Result<Option<ServerEvent>, LootError> {
        if !mob.can_drop_gold {
            return Ok(None);
        }
        let Some((min, max)) = gold_range(mob.level) else {
            return Ok(None);
        };
        if self.characters.get(killer).await?.is_none() {
            return Ok(None);
        }

        let amount = self.random.gen_range(min as i32, max as i32).max(0) as u32;
        if amount == 0 {
            return Ok(None);
        }
        self.characters.add_gold(killer, amount).await?;

        Ok(Some(ServerEvent::message(
            killer.to_uuid(),
            format!("You find {} gold on the {}.", amount, mob.name),
        )))
    }
}

#[async_trait]
impl EventSubscriber for LootService {
    fn name(&self) -> &'static str {
        "loot"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<Vec<ServerEvent>, RepoError> {
        match event {
            DomainEvent::MobDefeated {
                mob,
                killer,
                room_id,
            } => match self.drop_loot(mob, *killer, room_id).await {
                Ok(events) => Ok(events),
                Err(LootError::Repo(e)) => Err(e),
                Err(e) => {
                    tracing::warn!(mob = %mob.name, error = %e, "Loot resolution failed");
                    Ok(Vec::new())
                }
            },
        }
    }
}
