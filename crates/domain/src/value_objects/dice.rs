//! Dice notation for loot quantities.
//!
//! Supports `NdM` and `NdM+K` formulas, plain integers, and falls back to a
//! quantity of one for anything else.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error when parsing a dice formula
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceParseError {
    /// The formula string is empty
    #[error("Empty dice formula")]
    Empty,
    /// Invalid format - expected NdM or NdM+K
    #[error("Invalid dice format: {0}")]
    InvalidFormat(String),
    /// Dice count must be at least 1
    #[error("Dice count must be at least 1")]
    InvalidDiceCount,
    /// Die size must be at least 1
    #[error("Die size must be at least 1")]
    InvalidDieSize,
}

/// A parsed dice formula like "2d6+1"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceFormula {
    dice_count: u32,
    die_size: u32,
    modifier: u32,
}

impl DiceFormula {
    pub fn new(dice_count: u32, die_size: u32, modifier: u32) -> Result<Self, DiceParseError> {
        if dice_count == 0 {
            return Err(DiceParseError::InvalidDiceCount);
        }
        if die_size == 0 {
            return Err(DiceParseError::InvalidDieSize);
        }
        Ok(Self {
            dice_count,
            die_size,
            modifier,
        })
    }

    /// Parse "NdM" or "NdM+K". Parsed by hand to keep the domain free of regex.
    pub fn parse(input: &str) -> Result<Self, DiceParseError> {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return Err(DiceParseError::Empty);
        }

        let (count_str, rest) = input.split_once('d').ok_or_else(|| {
            DiceParseError::InvalidFormat(format!("Missing 'd' separator in '{}'", input))
        })?;

        let dice_count: u32 = count_str.parse().map_err(|_| {
            DiceParseError::InvalidFormat(format!("Invalid dice count: '{}'", count_str))
        })?;

        let (size_str, modifier) = match rest.split_once('+') {
            Some((size, modifier)) => {
                let modifier: u32 = modifier.parse().map_err(|_| {
                    DiceParseError::InvalidFormat(format!("Invalid modifier: '+{}'", modifier))
                })?;
                (size, modifier)
            }
            None => (rest, 0),
        };

        let die_size: u32 = size_str.parse().map_err(|_| {
            DiceParseError::InvalidFormat(format!("Invalid die size: '{}'", size_str))
        })?;

        Self::new(dice_count, die_size, modifier)
    }

    pub fn dice_count(&self) -> u32 {
        self.dice_count
    }

    pub fn die_size(&self) -> u32 {
        self.die_size
    }

    pub fn modifier(&self) -> u32 {
        self.modifier
    }

    pub fn min(&self) -> u32 {
        self.dice_count + self.modifier
    }

    pub fn max(&self) -> u32 {
        self.dice_count * self.die_size + self.modifier
    }

    /// Roll the formula. `roll_die(sides)` must return a value in `1..=sides`.
    pub fn roll(&self, mut roll_die: impl FnMut(u32) -> u32) -> u32 {
        let total: u32 = (0..self.dice_count)
            .map(|_| roll_die(self.die_size).clamp(1, self.die_size))
            .sum();
        total + self.modifier
    }
}

impl fmt::Display for DiceFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifier > 0 {
            write!(f, "{}d{}+{}", self.dice_count, self.die_size, self.modifier)
        } else {
            write!(f, "{}d{}", self.dice_count, self.die_size)
        }
    }
}

/// How many copies of a loot entry drop.
///
/// Serialized as the authored string ("1", "1d4", "2d6+1").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Quantity {
    Fixed(u32),
    Dice(DiceFormula),
}

impl Quantity {
    /// Lenient parse: dice formula, then leading integer, then 1.
    pub fn parse(input: &str) -> Self {
        if let Ok(formula) = DiceFormula::parse(input) {
            return Quantity::Dice(formula);
        }
        let digits: String = input
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        match digits.parse::<u32>() {
            Ok(n) if n > 0 => Quantity::Fixed(n),
            _ => Quantity::Fixed(1),
        }
    }

    pub fn resolve(&self, roll_die: impl FnMut(u32) -> u32) -> u32 {
        match self {
            Quantity::Fixed(n) => *n,
            Quantity::Dice(formula) => formula.roll(roll_die),
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::Fixed(1)
    }
}

impl From<String> for Quantity {
    fn from(value: String) -> Self {
        Quantity::parse(&value)
    }
}

impl From<Quantity> for String {
    fn from(value: Quantity) -> Self {
        match value {
            Quantity::Fixed(n) => n.to_string(),
            Quantity::Dice(formula) => formula.to_string(),
        }
    }
}
