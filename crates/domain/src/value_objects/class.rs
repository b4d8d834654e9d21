//! Character classes and their starting attribute spreads.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::StatBlock;
use crate::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CharacterClass {
    Vanguard,
    Shadowblade,
    AetherWeaver,
    Dawnkeeper,
    Technomancer,
    GloomWarden,
}

/// Level-one numbers for a freshly created character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassProfile {
    pub stats: StatBlock,
    pub max_hp: i32,
    pub max_mana: i32,
    pub defense: i32,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 6] = [
        CharacterClass::Vanguard,
        CharacterClass::Shadowblade,
        CharacterClass::AetherWeaver,
        CharacterClass::Dawnkeeper,
        CharacterClass::Technomancer,
        CharacterClass::GloomWarden,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterClass::Vanguard => "VANGUARD",
            CharacterClass::Shadowblade => "SHADOWBLADE",
            CharacterClass::AetherWeaver => "AETHER_WEAVER",
            CharacterClass::Dawnkeeper => "DAWNKEEPER",
            CharacterClass::Technomancer => "TECHNOMANCER",
            CharacterClass::GloomWarden => "GLOOM_WARDEN",
        }
    }

    pub fn profile(&self) -> ClassProfile {
        let (stats, max_hp, max_mana, defense) = match self {
            CharacterClass::Vanguard => (block(13, 8, 13, 6, 8, 8, 12), 115, 38, 3),
            CharacterClass::Shadowblade => (block(11, 13, 9, 8, 6, 13, 10), 95, 44, 1),
            CharacterClass::AetherWeaver => (block(6, 8, 11, 14, 8, 8, 13), 105, 62, 0),
            CharacterClass::Dawnkeeper => (block(8, 6, 13, 8, 14, 11, 10), 115, 62, 2),
            CharacterClass::Technomancer => (block(8, 13, 9, 13, 11, 6, 10), 95, 59, 1),
            CharacterClass::GloomWarden => (block(11, 8, 13, 6, 13, 8, 11), 115, 59, 2),
        };
        ClassProfile {
            stats,
            max_hp,
            max_mana,
            defense,
        }
    }
}

fn block(
    strength: i32,
    dexterity: i32,
    constitution: i32,
    intelligence: i32,
    wisdom: i32,
    charisma: i32,
    resolve: i32,
) -> StatBlock {
    StatBlock {
        strength,
        dexterity,
        constitution,
        intelligence,
        wisdom,
        charisma,
        resolve,
    }
}

impl FromStr for CharacterClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CharacterClass::ALL
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::parse(format!("Unknown character class: {}", s)))
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
