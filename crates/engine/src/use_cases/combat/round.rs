//! Resolution of a single combat round over freshly loaded combatants.
//!
//! Nothing here touches the store. The manager loads a [`Battlefield`],
//! runs [`RoundResolver::run`] and persists whatever changed.

use std::collections::HashMap;

use nightfall_domain::{
    Character, CharacterId, EffectiveStats, Item, Mob, MobId, SpellId, StatusKind,
};

use super::instance::{ActionVerb, ActiveStatus, CombatInstance, CombatantId, QueuedAction};
use crate::infrastructure::ports::{ContentRepo, RandomPort};
use crate::use_cases::attributes::AttributeService;
use crate::use_cases::spells::SpellEffectResolver;

/// Combatants of one room as read at the start of the round.
#[derive(Debug, Default)]
pub struct Battlefield {
    characters: HashMap<CharacterId, Character>,
    mobs: HashMap<MobId, Mob>,
    stats: HashMap<CombatantId, EffectiveStats>,
    initial_hp: HashMap<CombatantId, i32>,
    initial_mana: HashMap<CharacterId, i32>,
}

impl Battlefield {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_character(&mut self, character: Character, inventory: &[Item]) {
        let id = CombatantId::Character(character.id);
        self.stats
            .insert(id, AttributeService::for_character(&character, inventory));
        self.initial_hp.insert(id, character.hp);
        self.initial_mana.insert(character.id, character.mana);
        self.characters.insert(character.id, character);
    }

    pub fn insert_mob(&mut self, mob: Mob) {
        let id = CombatantId::Mob(mob.id);
        self.stats.insert(id, AttributeService::for_mob(&mob));
        self.initial_hp.insert(id, mob.hp);
        self.mobs.insert(mob.id, mob);
    }

    pub fn contains(&self, id: CombatantId) -> bool {
        self.stats.contains_key(&id)
    }

    pub fn is_alive(&self, id: CombatantId) -> bool {
        self.stats.get(&id).is_some_and(|stats| stats.hp > 0)
    }

    pub fn hp(&self, id: CombatantId) -> Option<i32> {
        self.stats.get(&id).map(|stats| stats.hp)
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(&id)
    }

    pub fn mob(&self, id: MobId) -> Option<&Mob> {
        self.mobs.get(&id)
    }

    fn name(&self, id: CombatantId) -> String {
        self.stats
            .get(&id)
            .map(|stats| stats.name.clone())
            .unwrap_or_default()
    }

    /// Survivors whose hp moved this round, after copying hp onto entities.
    pub fn changed_hp(&mut self) -> Vec<(CombatantId, i32)> {
        let mut changed = Vec::new();
        for (id, stats) in &self.stats {
            if stats.hp <= 0 || self.initial_hp.get(id) == Some(&stats.hp) {
                continue;
            }
            match id {
                CombatantId::Character(cid) => {
                    if let Some(character) = self.characters.get_mut(cid) {
                        character.set_hp(stats.hp);
                    }
                }
                CombatantId::Mob(mid) => {
                    if let Some(mob) = self.mobs.get_mut(mid) {
                        mob.set_hp(stats.hp);
                    }
                }
            }
            changed.push((*id, stats.hp));
        }
        changed
    }

    pub fn changed_mana(&self) -> Vec<(CharacterId, i32)> {
        self.characters
            .values()
            .filter(|c| self.is_alive(CombatantId::Character(c.id)))
            .filter(|c| self.initial_mana.get(&c.id) != Some(&c.mana))
            .map(|c| (c.id, c.mana))
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct RoundReport {
    pub messages: Vec<String>,
    /// Defeated mobs in the order they fell, with the character who landed the blow.
    pub defeated_mobs: Vec<(MobId, Option<CharacterId>)>,
    pub defeated_characters: Vec<CharacterId>,
}

impl RoundReport {
    fn land_damage(
        &mut self,
        field: &mut Battlefield,
        target: CombatantId,
        amount: i32,
        source: CombatantId,
    ) {
        let Some(stats) = field.stats.get_mut(&target) else {
            return;
        };
        let before = stats.hp;
        stats.hp = (before - amount).max(0);
        if before > 0 && stats.hp == 0 {
            self.record_defeat(target, source);
        }
    }

    fn record_defeat(&mut self, target: CombatantId, source: CombatantId) {
        match target {
            CombatantId::Mob(mob_id) => self.defeated_mobs.push((mob_id, source.as_character())),
            CombatantId::Character(character_id) => self.defeated_characters.push(character_id),
        }
    }
}

pub struct RoundResolver<'a> {
    pub content: &'a dyn ContentRepo,
    pub random: &'a dyn RandomPort,
    pub effects: &'a SpellEffectResolver,
}

impl RoundResolver<'_> {
    pub fn run(&self, instance: &mut CombatInstance, field: &mut Battlefield) -> RoundReport {
        self.plan_mob_turns(instance, field);

        let mut report = RoundReport::default();
        let mut carried = Vec::new();
        for action in instance.take_queue() {
            self.resolve_action(action, instance, field, &mut report, &mut carried);
        }

        self.status_upkeep(instance, field, &mut report);
        instance.count_down_statuses();
        for action in carried {
            instance.enqueue(action);
        }
        report
    }

    /// Sticky targeting: keep the previous target while it stands.
    fn plan_mob_turns(&self, instance: &mut CombatInstance, field: &Battlefield) {
        let living: Vec<CharacterId> = instance
            .character_ids()
            .into_iter()
            .filter(|id| field.is_alive(CombatantId::Character(*id)))
            .collect();
        if living.is_empty() {
            return;
        }

        for mob_id in instance.mob_ids() {
            if !field.is_alive(CombatantId::Mob(mob_id)) || instance.has_queued(mob_id) {
                continue;
            }
            let target = match instance.mob_target(mob_id) {
                Some(previous) if living.contains(&previous) => previous,
                _ => {
                    let pick = self.random.gen_range(0, living.len() as i32 - 1).max(0) as usize;
                    living[pick.min(living.len() - 1)]
                }
            };
            instance.set_mob_target(mob_id, target);
            instance.enqueue(QueuedAction::attack(mob_id, target));
        }
    }

    fn resolve_action(
        &self,
        action: QueuedAction,
        instance: &mut CombatInstance,
        field: &mut Battlefield,
        report: &mut RoundReport,
        carried: &mut Vec<QueuedAction>,
    ) {
        if !field.is_alive(action.actor) {
            return;
        }
        if instance.is_stunned(action.actor) {
            report
                .messages
                .push(format!("{} is stunned and cannot act!", field.name(action.actor)));
            return;
        }

        match action.verb {
            ActionVerb::Attack => {
                let Some(target) = action.target.filter(|t| field.is_alive(*t)) else {
                    return;
                };
                let (Some(attacker), Some(defender)) =
                    (field.stats.get(&action.actor), field.stats.get(&target))
                else {
                    return;
                };
                let damage = attacker.melee_damage_against(defender);
                let message = format!("{} hits {} for {} damage!", attacker.name, defender.name, damage);
                tracing::debug!(attacker = %attacker.name, defender = %defender.name, damage, "Attack resolved");
                report.messages.push(message);
                report.land_damage(field, target, damage, action.actor);
            }
            ActionVerb::Cast {
                spell_id,
                rounds_remaining,
            } if rounds_remaining > 0 => {
                carried.push(QueuedAction {
                    verb: ActionVerb::Cast {
                        spell_id,
                        rounds_remaining: rounds_remaining - 1,
                    },
                    ..action
                });
            }
            ActionVerb::Cast { spell_id, .. } => {
                let target = action.target.unwrap_or(action.actor);
                if !self.cast(action.actor, target, spell_id, instance, field, report) {
                    report
                        .messages
                        .push(format!("{}'s spell fizzles.", field.name(action.actor)));
                }
            }
        }
    }

    /// Returns `false` when the spell fizzled.
    fn cast(
        &self,
        caster: CombatantId,
        target: CombatantId,
        spell_id: SpellId,
        instance: &mut CombatInstance,
        field: &mut Battlefield,
        report: &mut RoundReport,
    ) -> bool {
        if !field.is_alive(target) {
            return false;
        }
        let Some(spell) = self.content.spell(spell_id) else {
            tracing::warn!(spell_id = %spell_id, "Queued spell missing from content");
            return false;
        };
        let (Some(caster_stats), Some(target_stats)) =
            (field.stats.get(&caster).cloned(), field.stats.get(&target).cloned())
        else {
            return false;
        };

        let mut after = target_stats.clone();
        let outcome = match self.effects.resolve(&spell, &caster_stats, &mut after) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(spell = %spell.name, error = %e, "Spell resolution failed");
                return false;
            }
        };

        report.messages.extend(outcome.messages);
        if after.hp < target_stats.hp {
            report.land_damage(field, target, target_stats.hp - after.hp, caster);
        } else if let Some(stats) = field.stats.get_mut(&target) {
            stats.hp = after.hp;
        }
        for applied in outcome.applied {
            instance.add_status(
                target,
                ActiveStatus {
                    status_id: applied.status.id,
                    name: applied.status.name,
                    kind: applied.status.kind,
                    base_value: applied.status.base_value,
                    remaining_rounds: applied.duration,
                    source: caster,
                },
            );
        }
        true
    }

    fn status_upkeep(
        &self,
        instance: &CombatInstance,
        field: &mut Battlefield,
        report: &mut RoundReport,
    ) {
        for participant in instance.participants() {
            for status in &participant.statuses {
                if !field.is_alive(participant.id) {
                    break;
                }
                let name = field.name(participant.id);
                match status.kind {
                    StatusKind::DamageOverTime => {
                        report.messages.push(format!(
                            "{} takes {} damage from {}.",
                            name, status.base_value, status.name
                        ));
                        report.land_damage(field, participant.id, status.base_value, status.source);
                    }
                    StatusKind::ManaDrain => {
                        let Some(character) = participant
                            .id
                            .as_character()
                            .and_then(|id| field.characters.get_mut(&id))
                        else {
                            continue;
                        };
                        let drained = status.base_value.min(character.mana).max(0);
                        character.mana -= drained;
                        report.messages.push(format!(
                            "{} loses {} mana to {}.",
                            name, drained, status.name
                        ));
                    }
                    StatusKind::Stun | StatusKind::Snare => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::StaticContent;
    use crate::infrastructure::clock::FixedRandom;
    use crate::test_fixtures::{character, mob};
    use nightfall_domain::{CharacterClass, RoomId, StatusEffectId};
    use std::sync::Arc;

    struct Fixture {
        content: Arc<StaticContent>,
        random: Arc<FixedRandom>,
        effects: SpellEffectResolver,
    }

    impl Fixture {
        fn new(random: FixedRandom) -> Self {
            let content = Arc::new(StaticContent::haven());
            let random = Arc::new(random);
            let effects = SpellEffectResolver::new(content.clone(), random.clone());
            Self {
                content,
                random,
                effects,
            }
        }

        fn resolver(&self) -> RoundResolver<'_> {
            RoundResolver {
                content: self.content.as_ref(),
                random: self.random.as_ref(),
                effects: &self.effects,
            }
        }
    }

    fn arena() -> RoomId {
        RoomId::new("the-arena")
    }

    #[test]
    fn player_action_resolves_before_mob_reply() {
        let fixture = Fixture::new(FixedRandom::low());
        let hero = character("Aria", CharacterClass::Vanguard, arena());
        let pup = mob("Gloomfang Pup", arena());
        let (hero_id, pup_id) = (hero.id, pup.id);

        let mut instance = CombatInstance::new(arena());
        instance.add_participant(hero_id);
        instance.add_participant(pup_id);
        instance.enqueue(QueuedAction::attack(hero_id, pup_id));

        let mut field = Battlefield::new();
        field.insert_character(hero, &[]);
        field.insert_mob(pup);

        let report = fixture.resolver().run(&mut instance, &mut field);

        assert_eq!(
            report.messages,
            vec![
                "Aria hits Gloomfang Pup for 12 damage!",
                "Gloomfang Pup hits Aria for 1 damage!",
            ]
        );
        assert_eq!(field.hp(CombatantId::Mob(pup_id)), Some(3));
        assert_eq!(instance.mob_target(pup_id), Some(hero_id));
        assert!(instance.queued().is_empty());
    }

    #[test]
    fn dead_actors_and_targets_are_skipped() {
        let fixture = Fixture::new(FixedRandom::low());
        let hero = character("Aria", CharacterClass::Vanguard, arena());
        let mut pup = mob("Gloomfang Pup", arena());
        pup.hp = 5;
        let (hero_id, pup_id) = (hero.id, pup.id);

        let mut instance = CombatInstance::new(arena());
        instance.add_participant(hero_id);
        instance.add_participant(pup_id);
        instance.enqueue(QueuedAction::attack(hero_id, pup_id));

        let mut field = Battlefield::new();
        field.insert_character(hero, &[]);
        field.insert_mob(pup);

        let report = fixture.resolver().run(&mut instance, &mut field);

        assert_eq!(report.messages, vec!["Aria hits Gloomfang Pup for 12 damage!"]);
        assert_eq!(report.defeated_mobs, vec![(pup_id, Some(hero_id))]);
        assert_eq!(field.hp(CombatantId::Mob(pup_id)), Some(0));
        assert!(field.changed_hp().is_empty());
    }

    #[test]
    fn stunned_mob_loses_its_action() {
        let fixture = Fixture::new(FixedRandom::low());
        let hero = character("Aria", CharacterClass::Vanguard, arena());
        let pup = mob("Gloomfang Pup", arena());
        let (hero_id, pup_id) = (hero.id, pup.id);

        let mut instance = CombatInstance::new(arena());
        instance.add_participant(hero_id);
        instance.add_participant(pup_id);
        instance.add_status(
            pup_id,
            ActiveStatus {
                status_id: StatusEffectId::new(2),
                name: "Stunned".into(),
                kind: StatusKind::Stun,
                base_value: 0,
                remaining_rounds: 1,
                source: CombatantId::Character(hero_id),
            },
        );

        let mut field = Battlefield::new();
        field.insert_character(hero, &[]);
        field.insert_mob(pup);

        let report = fixture.resolver().run(&mut instance, &mut field);

        assert_eq!(report.messages, vec!["Gloomfang Pup is stunned and cannot act!"]);
        assert!(!instance.is_stunned(pup_id));
    }

    #[test]
    fn casting_time_carries_the_spell_to_a_later_round() {
        let fixture = Fixture::new(FixedRandom::low());
        let mira = character("Mira", CharacterClass::AetherWeaver, arena());
        let mut pup = mob("Gloomfang Pup", arena());
        pup.hp = 100;
        pup.max_hp = 100;
        let (mira_id, pup_id) = (mira.id, pup.id);

        let mut instance = CombatInstance::new(arena());
        instance.add_participant(mira_id);
        instance.add_participant(pup_id);
        instance.enqueue(QueuedAction {
            actor: CombatantId::Character(mira_id),
            verb: ActionVerb::Cast {
                spell_id: SpellId::new(1),
                rounds_remaining: 1,
            },
            target: Some(CombatantId::Mob(pup_id)),
        });

        let mut field = Battlefield::new();
        field.insert_character(mira.clone(), &[]);
        field.insert_mob(pup.clone());
        let first = fixture.resolver().run(&mut instance, &mut field);
        assert!(first.messages.iter().all(|m| !m.contains("Glimmering Bolt")));
        assert_eq!(instance.queued().len(), 1);

        let second = fixture.resolver().run(&mut instance, &mut field);
        let expected = (15.0 + mira.stats.intelligence as f32 * 1.5).floor() as i32;
        assert_eq!(
            second.messages[0],
            format!("Mira's Glimmering Bolt hits Gloomfang Pup for {} damage!", expected)
        );
    }

    #[test]
    fn poison_ticks_at_end_of_round_and_credits_the_caster() {
        let fixture = Fixture::new(FixedRandom::low());
        let kest = character("Kest", CharacterClass::Shadowblade, arena());
        let mut pup = mob("Gloomfang Pup", arena());
        pup.hp = 4;
        pup.strength = 0;
        let (kest_id, pup_id) = (kest.id, pup.id);

        let mut instance = CombatInstance::new(arena());
        instance.add_participant(kest_id);
        instance.add_participant(pup_id);
        instance.add_status(
            pup_id,
            ActiveStatus {
                status_id: StatusEffectId::new(1),
                name: "Poisoned".into(),
                kind: StatusKind::DamageOverTime,
                base_value: 5,
                remaining_rounds: 3,
                source: CombatantId::Character(kest_id),
            },
        );

        let mut field = Battlefield::new();
        field.insert_character(kest, &[]);
        field.insert_mob(pup);

        let report = fixture.resolver().run(&mut instance, &mut field);

        assert_eq!(
            report.messages.last().map(String::as_str),
            Some("Gloomfang Pup takes 5 damage from Poisoned.")
        );
        assert_eq!(report.defeated_mobs, vec![(pup_id, Some(kest_id))]);
    }

    #[test]
    fn mob_without_previous_target_picks_among_the_living() {
        let fixture = Fixture::new(FixedRandom::with_roll(1));
        let aria = character("Aria", CharacterClass::Vanguard, arena());
        let bram = character("Bram", CharacterClass::Dawnkeeper, arena());
        let pup = mob("Gloomfang Pup", arena());
        let (aria_id, bram_id, pup_id) = (aria.id, bram.id, pup.id);

        let mut instance = CombatInstance::new(arena());
        instance.add_participant(aria_id);
        instance.add_participant(bram_id);
        instance.add_participant(pup_id);

        let mut field = Battlefield::new();
        field.insert_character(aria, &[]);
        field.insert_character(bram, &[]);
        field.insert_mob(pup);

        fixture.resolver().run(&mut instance, &mut field);
        assert_eq!(instance.mob_target(pup_id), Some(bram_id));

        // Sticky on the next round even though the roll would now pick Aria.
        let sticky = Fixture::new(FixedRandom::low());
        sticky.resolver().run(&mut instance, &mut field);
        assert_eq!(instance.mob_target(pup_id), Some(bram_id));
    }
}
