//! Character entity - a player-controlled combatant.
//!
//! Characters are never deleted by the simulation. Death is a state
//! transition handled by [`Character::die`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value_objects::{CharacterClass, CoreStat, StatBlock};
use crate::{CharacterId, RoomId};

/// Stat points granted per level gained.
pub const STAT_POINTS_PER_LEVEL: u32 = 2;
/// Max HP gained per level.
pub const MAX_HP_PER_LEVEL: i32 = 5;
/// Experience required to leave level one.
pub const STARTING_EXPERIENCE_TO_NEXT: u32 = 10;
pub const STARTING_GOLD: u32 = 10;

/// Experience needed to leave `level`.
pub fn experience_for_level(level: u32) -> u32 {
    level * 10
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub class: CharacterClass,
    pub level: u32,
    pub experience: u32,
    pub experience_to_next_level: u32,
    pub unspent_stat_points: u32,
    pub stats: StatBlock,
    pub defense: i32,
    pub hp: i32,
    pub max_hp: i32,
    pub mana: i32,
    pub max_mana: i32,
    pub gold: u32,
    pub room_id: RoomId,
}

/// One iteration of the leveling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub new_level: u32,
    pub max_hp: i32,
}

/// The leveling columns of a character, written back as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub level: u32,
    pub experience: u32,
    pub experience_to_next_level: u32,
    pub unspent_stat_points: u32,
    pub max_hp: i32,
}

/// Result of the zero-hp transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeathOutcome {
    pub experience_lost: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatAllocationError {
    #[error("no points assigned")]
    Empty,
    #[error("requested {requested} points but only {available} are unspent")]
    InsufficientPoints { requested: u32, available: u32 },
}

impl Character {
    /// A level-one character with its class's starting spread.
    pub fn new(name: impl Into<String>, class: CharacterClass, room_id: RoomId) -> Self {
        let profile = class.profile();
        Self {
            id: CharacterId::new(),
            name: name.into(),
            class,
            level: 1,
            experience: 0,
            experience_to_next_level: STARTING_EXPERIENCE_TO_NEXT,
            unspent_stat_points: 0,
            stats: profile.stats,
            defense: profile.defense,
            hp: profile.max_hp,
            max_hp: profile.max_hp,
            mana: profile.max_mana,
            max_mana: profile.max_mana,
            gold: STARTING_GOLD,
            room_id,
        }
    }

    pub fn progress(&self) -> Progress {
        Progress {
            level: self.level,
            experience: self.experience,
            experience_to_next_level: self.experience_to_next_level,
            unspent_stat_points: self.unspent_stat_points,
            max_hp: self.max_hp,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Clamp hp into `[0, max_hp]`.
    pub fn set_hp(&mut self, hp: i32) {
        self.hp = hp.clamp(0, self.max_hp);
    }

    /// Restores up to `amount` hp and returns the amount actually healed.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.set_hp(self.hp + amount.max(0));
        self.hp - before
    }

    pub fn can_afford_mana(&self, cost: i32) -> bool {
        self.mana >= cost
    }

    pub fn spend_mana(&mut self, cost: i32) {
        self.mana = (self.mana - cost).clamp(0, self.max_mana);
    }

    /// Grants experience and runs the leveling loop.
    ///
    /// Each iteration carries leftover experience over, sets the next
    /// threshold from the new level, grants stat points, raises max hp and
    /// fully restores hp and mana.
    pub fn gain_experience(&mut self, amount: u32) -> Vec<LevelUp> {
        self.experience = self.experience.saturating_add(amount);

        let mut level_ups = Vec::new();
        while self.experience_to_next_level > 0
            && self.experience >= self.experience_to_next_level
        {
            self.experience -= self.experience_to_next_level;
            self.level += 1;
            self.experience_to_next_level = experience_for_level(self.level);
            self.unspent_stat_points += STAT_POINTS_PER_LEVEL;
            self.max_hp += MAX_HP_PER_LEVEL;
            self.hp = self.max_hp;
            self.mana = self.max_mana;
            level_ups.push(LevelUp {
                new_level: self.level,
                max_hp: self.max_hp,
            });
        }
        level_ups
    }

    /// Death penalty: lose `penalty_percent` of the next-level threshold
    /// (never below zero), restore hp and move to `respawn_room`.
    pub fn die(&mut self, penalty_percent: u32, respawn_room: RoomId) -> DeathOutcome {
        let penalty = (u64::from(self.experience_to_next_level) * u64::from(penalty_percent) / 100) as u32;
        let experience_lost = penalty.min(self.experience);
        self.experience -= experience_lost;
        self.hp = self.max_hp;
        self.room_id = respawn_room;
        DeathOutcome { experience_lost }
    }

    /// Spend unspent points on core stats. All or nothing.
    pub fn assign_stats(
        &mut self,
        allocation: &[(CoreStat, u32)],
    ) -> Result<u32, StatAllocationError> {
        let insufficient = |requested: u32| StatAllocationError::InsufficientPoints {
            requested,
            available: self.unspent_stat_points,
        };
        let requested = allocation
            .iter()
            .try_fold(0u32, |total, (_, points)| total.checked_add(*points))
            .ok_or_else(|| insufficient(u32::MAX))?;
        if requested == 0 {
            return Err(StatAllocationError::Empty);
        }
        if requested > self.unspent_stat_points {
            return Err(insufficient(requested));
        }

        let mut raised = self.stats;
        for (stat, points) in allocation {
            let points = i32::try_from(*points).map_err(|_| insufficient(requested))?;
            raised.raise(*stat, points);
        }
        self.stats = raised;
        self.unspent_stat_points -= requested;
        Ok(requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Character {
        Character::new("Aria", CharacterClass::Vanguard, RoomId::new("town-square"))
    }

    #[test]
    fn single_level_up_carries_leftover() {
        let mut c = fresh();
        c.experience = 8;
        let ups = c.gain_experience(7);
        assert_eq!(ups.len(), 1);
        assert_eq!(c.level, 2);
        assert_eq!(c.experience, 5);
        assert_eq!(c.experience_to_next_level, 20);
        assert_eq!(c.unspent_stat_points, 2);
        assert_eq!(c.max_hp, 120);
        assert_eq!(c.hp, 120);
    }

    #[test]
    fn large_grant_loops_through_several_levels() {
        let mut c = fresh();
        // 10 to reach 2, 20 to reach 3, 30 to reach 4, 4 left over
        let ups = c.gain_experience(64);
        assert_eq!(ups.iter().map(|u| u.new_level).collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(c.level, 4);
        assert_eq!(c.experience, 4);
        assert!(c.experience < c.experience_to_next_level);
        assert_eq!(c.unspent_stat_points, 2 * 3);
    }

    #[test]
    fn leveling_terminates_for_any_leftover() {
        for leftover in [0u32, 1, 9, 10, 35, 500] {
            let mut c = fresh();
            let ups = c.gain_experience(c.experience_to_next_level + leftover);
            assert!(!ups.is_empty());
            assert!(c.experience < c.experience_to_next_level);
            assert_eq!(c.unspent_stat_points, STAT_POINTS_PER_LEVEL * ups.len() as u32);
        }
    }

    #[test]
    fn leveling_restores_mana() {
        let mut c = fresh();
        c.mana = 1;
        c.gain_experience(10);
        assert_eq!(c.mana, c.max_mana);
    }

    #[test]
    fn death_costs_ten_percent_and_respawns() {
        let mut c = fresh();
        c.experience_to_next_level = 40;
        c.experience = 7;
        c.hp = 0;
        c.room_id = RoomId::new("the-arena");
        let outcome = c.die(10, RoomId::new("town-square"));
        assert_eq!(outcome.experience_lost, 4);
        assert_eq!(c.experience, 3);
        assert_eq!(c.hp, c.max_hp);
        assert_eq!(c.room_id, RoomId::new("town-square"));
    }

    #[test]
    fn death_penalty_never_goes_negative() {
        let mut c = fresh();
        c.experience_to_next_level = 100;
        c.experience = 3;
        let outcome = c.die(10, RoomId::new("town-square"));
        assert_eq!(outcome.experience_lost, 3);
        assert_eq!(c.experience, 0);
    }

    #[test]
    fn assign_stats_is_all_or_nothing() {
        let mut c = fresh();
        c.unspent_stat_points = 2;
        let err = c
            .assign_stats(&[(CoreStat::Strength, 2), (CoreStat::Wisdom, 1)])
            .unwrap_err();
        assert_eq!(
            err,
            StatAllocationError::InsufficientPoints {
                requested: 3,
                available: 2
            }
        );
        assert_eq!(c.stats.strength, 13);

        c.assign_stats(&[(CoreStat::Strength, 1), (CoreStat::Wisdom, 1)])
            .unwrap();
        assert_eq!(c.stats.strength, 14);
        assert_eq!(c.stats.wisdom, 9);
        assert_eq!(c.unspent_stat_points, 0);
    }

    #[test]
    fn oversized_allocation_is_refused_instead_of_wrapping() {
        let mut c = fresh();
        c.unspent_stat_points = 1;

        let err = c
            .assign_stats(&[(CoreStat::Strength, u32::MAX), (CoreStat::Wisdom, 2)])
            .unwrap_err();
        assert!(matches!(err, StatAllocationError::InsufficientPoints { available: 1, .. }));

        let err = c.assign_stats(&[(CoreStat::Strength, u32::MAX)]).unwrap_err();
        assert!(matches!(err, StatAllocationError::InsufficientPoints { .. }));
        assert_eq!(c.stats.strength, 13);
        assert_eq!(c.stats.wisdom, 8);
        assert_eq!(c.unspent_stat_points, 1);
    }

    #[test]
    fn progress_mirrors_the_leveling_columns() {
        let mut c = fresh();
        c.gain_experience(12);
        let progress = c.progress();
        assert_eq!(progress.level, 2);
        assert_eq!(progress.experience, 2);
        assert_eq!(progress.unspent_stat_points, 2);
        assert_eq!(progress.max_hp, c.max_hp);
    }

    #[test]
    fn hp_is_clamped() {
        let mut c = fresh();
        c.set_hp(-12);
        assert_eq!(c.hp, 0);
        assert_eq!(c.heal(1_000), c.max_hp);
        assert_eq!(c.hp, c.max_hp);
    }
}
