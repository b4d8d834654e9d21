//! Per-room combat state: participants, queued actions, mob targets.

use std::collections::HashMap;

use nightfall_domain::{CharacterId, MobId, RoomId, SpellId, StatusEffectId, StatusKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatantId {
    Character(CharacterId),
    Mob(MobId),
}

impl CombatantId {
    pub fn as_character(&self) -> Option<CharacterId> {
        match self {
            CombatantId::Character(id) => Some(*id),
            CombatantId::Mob(_) => None,
        }
    }

    pub fn as_mob(&self) -> Option<MobId> {
        match self {
            CombatantId::Mob(id) => Some(*id),
            CombatantId::Character(_) => None,
        }
    }
}

impl From<CharacterId> for CombatantId {
    fn from(id: CharacterId) -> Self {
        CombatantId::Character(id)
    }
}

impl From<MobId> for CombatantId {
    fn from(id: MobId) -> Self {
        CombatantId::Mob(id)
    }
}

/// A status riding on a participant for a number of rounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveStatus {
    pub status_id: StatusEffectId,
    pub name: String,
    pub kind: StatusKind,
    pub base_value: i32,
    pub remaining_rounds: u32,
    pub source: CombatantId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionVerb {
    Attack,
    Cast {
        spell_id: SpellId,
        /// Rounds left before the effects land.
        rounds_remaining: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueuedAction {
    pub actor: CombatantId,
    pub verb: ActionVerb,
    pub target: Option<CombatantId>,
}

impl QueuedAction {
    pub fn attack(actor: impl Into<CombatantId>, target: impl Into<CombatantId>) -> Self {
        Self {
            actor: actor.into(),
            verb: ActionVerb::Attack,
            target: Some(target.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub id: CombatantId,
    pub statuses: Vec<ActiveStatus>,
}

/// Participants live in a dense vector with an id index beside it.
#[derive(Debug, Clone)]
pub struct CombatInstance {
    room_id: RoomId,
    participants: Vec<Participant>,
    index: HashMap<CombatantId, usize>,
    queue: Vec<QueuedAction>,
    mob_targets: HashMap<MobId, CharacterId>,
}

impl CombatInstance {
    pub fn new(room_id: RoomId) -> Self {
        Self {
            room_id,
            participants: Vec::new(),
            index: HashMap::new(),
            queue: Vec::new(),
            mob_targets: HashMap::new(),
        }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Returns `false` if already present.
    pub fn add_participant(&mut self, id: impl Into<CombatantId>) -> bool {
        let id = id.into();
        if self.index.contains_key(&id) {
            return false;
        }
        self.index.insert(id, self.participants.len());
        self.participants.push(Participant {
            id,
            statuses: Vec::new(),
        });
        true
    }

    /// Drops the participant, its own queued actions and any targeting tied
    /// to it. Actions aimed at it stay queued and no-op when resolved.
    pub fn remove_participant(&mut self, id: impl Into<CombatantId>) -> Option<Participant> {
        let id = id.into();
        let position = self.index.remove(&id)?;
        let removed = self.participants.swap_remove(position);
        if let Some(moved) = self.participants.get(position) {
            self.index.insert(moved.id, position);
        }

        self.queue.retain(|action| action.actor != id);
        match id {
            CombatantId::Mob(mob_id) => {
                self.mob_targets.remove(&mob_id);
            }
            CombatantId::Character(character_id) => {
                self.mob_targets.retain(|_, target| *target != character_id);
            }
        }
        Some(removed)
    }

    pub fn contains(&self, id: impl Into<CombatantId>) -> bool {
        self.index.contains_key(&id.into())
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn character_ids(&self) -> Vec<CharacterId> {
        self.participants
            .iter()
            .filter_map(|p| p.id.as_character())
            .collect()
    }

    pub fn mob_ids(&self) -> Vec<MobId> {
        self.participants.iter().filter_map(|p| p.id.as_mob()).collect()
    }

    /// One action per actor per round; a newer action replaces the older one.
    pub fn enqueue(&mut self, action: QueuedAction) {
        match self.queue.iter_mut().find(|queued| queued.actor == action.actor) {
            Some(existing) => *existing = action,
            None => self.queue.push(action),
        }
    }

    pub fn has_queued(&self, actor: impl Into<CombatantId>) -> bool {
        let actor = actor.into();
        self.queue.iter().any(|action| action.actor == actor)
    }

    pub fn queued(&self) -> &[QueuedAction] {
        &self.queue
    }

    pub fn take_queue(&mut self) -> Vec<QueuedAction> {
        std::mem::take(&mut self.queue)
    }

    pub fn set_mob_target(&mut self, mob_id: MobId, character_id: CharacterId) {
        self.mob_targets.insert(mob_id, character_id);
    }

    pub fn mob_target(&self, mob_id: MobId) -> Option<CharacterId> {
        self.mob_targets.get(&mob_id).copied()
    }

    pub fn mob_targets(&self) -> &HashMap<MobId, CharacterId> {
        &self.mob_targets
    }

    /// Reapplying a status refreshes its duration instead of stacking.
    pub fn add_status(&mut self, id: impl Into<CombatantId>, status: ActiveStatus) {
        let Some(&position) = self.index.get(&id.into()) else {
            return;
        };
        let statuses = &mut self.participants[position].statuses;
        match statuses.iter_mut().find(|s| s.status_id == status.status_id) {
            Some(existing) => *existing = status,
            None => statuses.push(status),
        }
    }

    pub fn statuses(&self, id: impl Into<CombatantId>) -> &[ActiveStatus] {
        self.index
            .get(&id.into())
            .map(|&position| self.participants[position].statuses.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_stunned(&self, id: impl Into<CombatantId>) -> bool {
        self.statuses(id)
            .iter()
            .any(|status| status.kind == StatusKind::Stun && status.remaining_rounds > 0)
    }

    /// Counts every status down one round and drops the expired ones.
    pub fn count_down_statuses(&mut self) {
        for participant in &mut self.participants {
            for status in &mut participant.statuses {
                status.remaining_rounds = status.remaining_rounds.saturating_sub(1);
            }
            participant.statuses.retain(|status| status.remaining_rounds > 0);
        }
    }
}
