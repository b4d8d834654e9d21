//! Owner of every active combat instance and the round scheduler.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use nightfall_domain::{Character, CharacterId, DomainEvent, Mob, MobId, RoomId, Spell};
use nightfall_shared::ServerEvent;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::instance::{ActionVerb, CombatInstance, CombatantId, QueuedAction};
use super::round::{Battlefield, RoundResolver};
use super::CombatError;
use crate::app::Repositories;
use crate::infrastructure::event_bus::EventBus;
use crate::infrastructure::ports::{BroadcastPort, RandomPort};
use crate::use_cases::death::DeathService;
use crate::use_cases::snapshot::{CombatView, SnapshotBuilder};
use crate::use_cases::spells::SpellEffectResolver;

struct RoundOutcome {
    events: Vec<ServerEvent>,
    ended: bool,
}

pub struct CombatManager {
    instances: Mutex<HashMap<RoomId, CombatInstance>>,
    repos: Repositories,
    random: Arc<dyn RandomPort>,
    effects: SpellEffectResolver,
    events: EventBus,
    death: DeathService,
    snapshots: SnapshotBuilder,
    broadcast: Arc<dyn BroadcastPort>,
    tick_interval: Duration,
}

impl CombatManager {
    pub fn new(
        repos: Repositories,
        random: Arc<dyn RandomPort>,
        events: EventBus,
        death: DeathService,
        snapshots: SnapshotBuilder,
        broadcast: Arc<dyn BroadcastPort>,
        tick_interval: Duration,
    ) -> Self {
        let effects = SpellEffectResolver::new(repos.content.clone(), random.clone());
        Self {
            instances: Mutex::new(HashMap::new()),
            repos,
            random,
            effects,
            events,
            death,
            snapshots,
            broadcast,
            tick_interval,
        }
    }

    fn instance_for<'a>(
        instances: &'a mut HashMap<RoomId, CombatInstance>,
        room_id: &RoomId,
    ) -> &'a mut CombatInstance {
        instances.entry(room_id.clone()).or_insert_with(|| {
            tracing::info!(room_id = %room_id, "Combat started");
            CombatInstance::new(room_id.clone())
        })
    }

    /// Hostile mobs in the character's room turn on the character at once.
    pub async fn check_for_aggression(
        &self,
        character: &Character,
    ) -> Result<Vec<ServerEvent>, CombatError> {
        let hostile: Vec<Mob> = self
            .repos
            .mobs
            .list_in_room(&character.room_id)
            .await?
            .into_iter()
            .filter(|mob| mob.is_hostile() && mob.is_alive())
            .collect();
        if hostile.is_empty() {
            return Ok(Vec::new());
        }

        let mut instances = self.instances.lock().await;
        let instance = Self::instance_for(&mut instances, &character.room_id);
        instance.add_participant(character.id);

        let mut events = Vec::with_capacity(hostile.len());
        for mob in &hostile {
            instance.add_participant(mob.id);
            instance.set_mob_target(mob.id, character.id);
            instance.enqueue(QueuedAction::attack(mob.id, character.id));
            events.push(ServerEvent::room_message(
                character.room_id.as_str(),
                format!("The {} becomes aggressive!", mob.name),
                Vec::new(),
            ));
        }
        Ok(events)
    }

    /// Damage lands on the next tick, not here.
    pub async fn queue_attack(&self, character: &Character, mob: &Mob) {
        let mut instances = self.instances.lock().await;
        let instance = Self::instance_for(&mut instances, &character.room_id);
        instance.add_participant(character.id);
        instance.add_participant(mob.id);
        instance.enqueue(QueuedAction::attack(character.id, mob.id));
        if instance.mob_target(mob.id).is_none() {
            instance.set_mob_target(mob.id, character.id);
        }
        tracing::debug!(character_id = %character.id, mob = %mob.name, "Attack queued");
    }

    pub async fn queue_spell(&self, character: &Character, spell: &Spell, target: CombatantId) {
        let mut instances = self.instances.lock().await;
        let instance = Self::instance_for(&mut instances, &character.room_id);
        instance.add_participant(character.id);
        instance.add_participant(target);
        instance.enqueue(QueuedAction {
            actor: CombatantId::Character(character.id),
            verb: ActionVerb::Cast {
                spell_id: spell.id,
                rounds_remaining: spell.casting_time,
            },
            target: Some(target),
        });
        tracing::debug!(character_id = %character.id, spell = %spell.name, "Spell queued");
    }

    /// Pulls a mob that survived an out-of-combat spell into a fight.
    pub async fn engage(&self, character: &Character, mob: &Mob) -> ServerEvent {
        let mut instances = self.instances.lock().await;
        let instance = Self::instance_for(&mut instances, &character.room_id);
        instance.add_participant(character.id);
        instance.add_participant(mob.id);
        instance.set_mob_target(mob.id, character.id);
        ServerEvent::room_message(
            character.room_id.as_str(),
            format!("The {} becomes aggressive!", mob.name),
            Vec::new(),
        )
    }

    /// Leaves queued actions aimed at the character in place; they no-op.
    pub async fn remove_character_from_combat(&self, character_id: CharacterId) {
        let mut instances = self.instances.lock().await;
        instances.retain(|room_id, instance| {
            if instance.remove_participant(character_id).is_none() {
                return true;
            }
            let keep = !instance.character_ids().is_empty();
            if !keep {
                tracing::info!(room_id = %room_id, "Combat ended");
            }
            keep
        });
    }

    pub async fn is_in_combat(&self, character_id: CharacterId) -> bool {
        let instances = self.instances.lock().await;
        instances
            .values()
            .any(|instance| instance.contains(character_id))
    }

    pub async fn combat_view(&self, room_id: &RoomId, character_id: CharacterId) -> CombatView {
        let instances = self.instances.lock().await;
        match instances.get(room_id) {
            Some(instance) => CombatView {
                in_combat: instance.contains(character_id),
                mob_targets: instance.mob_targets().clone(),
            },
            None => CombatView::out_of_combat(),
        }
    }

    pub async fn active_rooms(&self) -> usize {
        self.instances.lock().await.len()
    }

    /// A mob killed outside the round loop by an instant spell.
    pub async fn settle_spell_kill(
        &self,
        mob: Mob,
        killer: CharacterId,
    ) -> Result<Vec<ServerEvent>, CombatError> {
        self.repos.mobs.delete_many(&[mob.id]).await?;
        let released = {
            let mut instances = self.instances.lock().await;
            match instances.get_mut(&mob.room_id) {
                Some(instance) => {
                    instance.remove_participant(mob.id);
                    if instance.mob_ids().is_empty() {
                        let fighters = instance.character_ids();
                        instances.remove(&mob.room_id);
                        tracing::info!(room_id = %mob.room_id, "Combat ended");
                        fighters
                    } else {
                        Vec::new()
                    }
                }
                None => Vec::new(),
            }
        };

        let room_id = mob.room_id.clone();
        let mut events = vec![ServerEvent::room_message(
            room_id.as_str(),
            format!("The {} has been defeated!", mob.name),
            Vec::new(),
        )];
        // The caster gets a full update from the cast itself.
        for character_id in released.into_iter().filter(|id| *id != killer) {
            match self
                .snapshots
                .build(character_id, "", &CombatView::out_of_combat())
                .await
            {
                Ok(snapshot) => events.push(snapshot),
                Err(e) => {
                    tracing::warn!(character_id = %character_id, error = %e, "Skipping combat snapshot")
                }
            }
        }
        let event = DomainEvent::MobDefeated {
            mob,
            killer: Some(killer),
            room_id,
        };
        events.extend(self.events.publish(&event).await);
        Ok(events)
    }

    /// One scheduler tick: resolve every room, then push the results out.
    pub async fn tick(&self) {
        let events = self.resolve_all_rounds().await;
        if !events.is_empty() {
            self.broadcast.broadcast(events).await;
        }
    }

    /// A failing room is logged and skipped; the other rooms still resolve.
    pub async fn resolve_all_rounds(&self) -> Vec<ServerEvent> {
        let mut instances = self.instances.lock().await;
        let mut rooms: Vec<RoomId> = instances.keys().cloned().collect();
        rooms.sort_by(|a, b| a.as_str().cmp(b.as_str()));

        let mut events = Vec::new();
        for room_id in rooms {
            let Some(instance) = instances.get_mut(&room_id) else {
                continue;
            };
            match self.resolve_round(instance).await {
                Ok(outcome) => {
                    events.extend(outcome.events);
                    if outcome.ended {
                        instances.remove(&room_id);
                        tracing::info!(room_id = %room_id, "Combat ended");
                    }
                }
                Err(e) => {
                    tracing::error!(room_id = %room_id, error = %e, "Combat round failed");
                }
            }
        }
        events
    }

    async fn load_battlefield(
        &self,
        instance: &mut CombatInstance,
    ) -> Result<Battlefield, CombatError> {
        let room_id = instance.room_id().clone();
        let characters = self
            .repos
            .characters
            .get_many(&instance.character_ids())
            .await?;
        let mobs = self.repos.mobs.get_many(&instance.mob_ids()).await?;

        let mut field = Battlefield::new();
        for character in characters {
            if character.room_id != room_id {
                continue;
            }
            let inventory = self.repos.items.list_for_character(character.id).await?;
            field.insert_character(character, &inventory);
        }
        for mob in mobs.into_iter().filter(|mob| mob.room_id == room_id) {
            field.insert_mob(mob);
        }

        let gone: Vec<CombatantId> = instance
            .participants()
            .iter()
            .map(|participant| participant.id)
            .filter(|id| !field.contains(*id))
            .collect();
        for id in gone {
            tracing::debug!(room_id = %room_id, participant = ?id, "Dropping absent participant");
            instance.remove_participant(id);
        }
        Ok(field)
    }

    async fn resolve_round(&self, instance: &mut CombatInstance) -> Result<RoundOutcome, CombatError> {
        let room_id = instance.room_id().clone();
        let mut field = self.load_battlefield(instance).await?;
        let present = instance.character_ids();

        let report = RoundResolver {
            content: self.repos.content.as_ref(),
            random: self.random.as_ref(),
            effects: &self.effects,
        }
        .run(instance, &mut field);

        for (id, hp) in field.changed_hp() {
            match id {
                CombatantId::Character(character_id) => {
                    self.repos.characters.update_hp(character_id, hp).await?
                }
                CombatantId::Mob(mob_id) => self.repos.mobs.update_hp(mob_id, hp).await?,
            }
        }
        for (character_id, mana) in field.changed_mana() {
            self.repos.characters.update_mana(character_id, mana).await?;
        }

        let defeated_mobs: Vec<MobId> = report.defeated_mobs.iter().map(|(id, _)| *id).collect();
        if !defeated_mobs.is_empty() {
            self.repos.mobs.delete_many(&defeated_mobs).await?;
        }
        for mob_id in &defeated_mobs {
            instance.remove_participant(*mob_id);
        }
        for character_id in &report.defeated_characters {
            instance.remove_participant(*character_id);
        }

        let room = room_id.as_str();
        let mut events: Vec<ServerEvent> = report
            .messages
            .into_iter()
            .map(|message| ServerEvent::room_message(room, message, Vec::new()))
            .collect();

        for (mob_id, killer) in &report.defeated_mobs {
            let Some(mob) = field.mob(*mob_id).cloned() else {
                continue;
            };
            tracing::info!(room_id = %room_id, mob = %mob.name, killer = ?killer, "Mob defeated");
            events.push(ServerEvent::room_message(
                room,
                format!("The {} has been defeated!", mob.name),
                Vec::new(),
            ));
            let event = DomainEvent::MobDefeated {
                mob,
                killer: *killer,
                room_id: room_id.clone(),
            };
            events.extend(self.events.publish(&event).await);
        }

        for character_id in &report.defeated_characters {
            let name = field
                .character(*character_id)
                .map(|c| c.name.clone())
                .unwrap_or_default();
            events.push(ServerEvent::room_message(
                room,
                format!("{} has been defeated!", name),
                Vec::new(),
            ));
            match self.death.handle_death(*character_id).await {
                Ok(death_events) => events.extend(death_events),
                Err(e) => {
                    tracing::error!(character_id = %character_id, error = %e, "Death handling failed")
                }
            }
        }

        let mobs_standing = instance
            .mob_ids()
            .into_iter()
            .any(|id| field.is_alive(CombatantId::Mob(id)));
        let characters_standing = instance
            .character_ids()
            .into_iter()
            .any(|id| field.is_alive(CombatantId::Character(id)));
        let ended = !mobs_standing || !characters_standing;

        for character_id in present {
            let view = if !ended && instance.contains(character_id) {
                CombatView {
                    in_combat: true,
                    mob_targets: instance.mob_targets().clone(),
                }
            } else {
                CombatView::out_of_combat()
            };
            match self.snapshots.build(character_id, "", &view).await {
                Ok(snapshot) => events.push(snapshot),
                Err(e) => {
                    tracing::warn!(character_id = %character_id, error = %e, "Skipping combat snapshot")
                }
            }
        }

        Ok(RoundOutcome { events, ended })
    }

    /// Fixed-period loop; the first round runs one interval after start.
    pub fn spawn_scheduler(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval.tick().await;
            loop {
                interval.tick().await;
                self.tick().await;
            }
        })
    }
}
