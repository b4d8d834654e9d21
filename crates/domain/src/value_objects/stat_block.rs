//! Attribute blocks and the stat vocabulary shared by items and combatants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DomainError;

/// The six attributes a player may spend stat points on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoreStat {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl CoreStat {
    pub const ALL: [CoreStat; 6] = [
        CoreStat::Strength,
        CoreStat::Dexterity,
        CoreStat::Constitution,
        CoreStat::Intelligence,
        CoreStat::Wisdom,
        CoreStat::Charisma,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CoreStat::Strength => "strength",
            CoreStat::Dexterity => "dexterity",
            CoreStat::Constitution => "constitution",
            CoreStat::Intelligence => "intelligence",
            CoreStat::Wisdom => "wisdom",
            CoreStat::Charisma => "charisma",
        }
    }
}

impl FromStr for CoreStat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoreStat::ALL
            .into_iter()
            .find(|stat| stat.as_str() == s)
            .ok_or_else(|| DomainError::parse(format!("Unknown core stat: {}", s)))
    }
}

impl fmt::Display for CoreStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every stat an item or affix may modify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatKind {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
    Resolve,
    Defense,
    Damage,
    Armor,
    MagicResist,
}

impl StatKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatKind::Strength => "strength",
            StatKind::Dexterity => "dexterity",
            StatKind::Constitution => "constitution",
            StatKind::Intelligence => "intelligence",
            StatKind::Wisdom => "wisdom",
            StatKind::Charisma => "charisma",
            StatKind::Resolve => "resolve",
            StatKind::Defense => "defense",
            StatKind::Damage => "damage",
            StatKind::Armor => "armor",
            StatKind::MagicResist => "magicResist",
        }
    }
}

impl From<CoreStat> for StatKind {
    fn from(stat: CoreStat) -> Self {
        match stat {
            CoreStat::Strength => StatKind::Strength,
            CoreStat::Dexterity => StatKind::Dexterity,
            CoreStat::Constitution => StatKind::Constitution,
            CoreStat::Intelligence => StatKind::Intelligence,
            CoreStat::Wisdom => StatKind::Wisdom,
            CoreStat::Charisma => StatKind::Charisma,
        }
    }
}

/// Base attributes of a character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatBlock {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
    pub resolve: i32,
}

impl StatBlock {
    pub fn get(&self, stat: CoreStat) -> i32 {
        match stat {
            CoreStat::Strength => self.strength,
            CoreStat::Dexterity => self.dexterity,
            CoreStat::Constitution => self.constitution,
            CoreStat::Intelligence => self.intelligence,
            CoreStat::Wisdom => self.wisdom,
            CoreStat::Charisma => self.charisma,
        }
    }

    pub fn raise(&mut self, stat: CoreStat, points: i32) {
        let slot = match stat {
            CoreStat::Strength => &mut self.strength,
            CoreStat::Dexterity => &mut self.dexterity,
            CoreStat::Constitution => &mut self.constitution,
            CoreStat::Intelligence => &mut self.intelligence,
            CoreStat::Wisdom => &mut self.wisdom,
            CoreStat::Charisma => &mut self.charisma,
        };
        *slot = slot.saturating_add(points);
    }
}

/// A combatant's stats after equipment and affixes are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveStats {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub attributes: StatBlock,
    pub defense: i32,
    pub damage: i32,
    pub armor: i32,
    pub magic_resist: i32,
}

impl EffectiveStats {
    /// Offensive strength used by the melee formula.
    pub fn effective_strength(&self) -> i32 {
        self.attributes.strength + self.damage
    }

    /// Mitigation used by the melee formula.
    pub fn effective_defense(&self) -> i32 {
        self.defense + self.armor
    }

    /// `max(1, attacker strength - defender defense)`
    pub fn melee_damage_against(&self, defender: &EffectiveStats) -> i32 {
        (self.effective_strength() - defender.effective_defense()).max(1)
    }

    pub fn apply(&mut self, kind: StatKind, delta: i32) {
        match kind {
            StatKind::Strength => self.attributes.strength += delta,
            StatKind::Dexterity => self.attributes.dexterity += delta,
            StatKind::Constitution => self.attributes.constitution += delta,
            StatKind::Intelligence => self.attributes.intelligence += delta,
            StatKind::Wisdom => self.attributes.wisdom += delta,
            StatKind::Charisma => self.attributes.charisma += delta,
            StatKind::Resolve => self.attributes.resolve += delta,
            StatKind::Defense => self.defense += delta,
            StatKind::Damage => self.damage += delta,
            StatKind::Armor => self.armor += delta,
            StatKind::MagicResist => self.magic_resist += delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(strength: i32, defense: i32) -> EffectiveStats {
        EffectiveStats {
            name: "x".into(),
            hp: 10,
            max_hp: 10,
            attributes: StatBlock {
                strength,
                ..StatBlock::default()
            },
            defense,
            damage: 0,
            armor: 0,
            magic_resist: 0,
        }
    }

    #[test]
    fn melee_damage_never_drops_below_one() {
        assert_eq!(stats(13, 3).melee_damage_against(&stats(4, 1)), 12);
        assert_eq!(stats(2, 0).melee_damage_against(&stats(4, 50)), 1);
    }

    #[test]
    fn gear_bonuses_feed_the_melee_formula() {
        let mut attacker = stats(10, 0);
        attacker.apply(StatKind::Damage, 3);
        let mut defender = stats(0, 2);
        defender.apply(StatKind::Armor, 3);
        assert_eq!(attacker.melee_damage_against(&defender), 8);
    }

    #[test]
    fn core_stat_parses_only_the_six_attributes() {
        assert_eq!("wisdom".parse::<CoreStat>().unwrap(), CoreStat::Wisdom);
        assert!("resolve".parse::<CoreStat>().is_err());
        assert_eq!(
            "gold".parse::<CoreStat>(),
            Err(DomainError::Parse("Unknown core stat: gold".into()))
        );
    }
}
