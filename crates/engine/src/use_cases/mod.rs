//! Use cases - gameplay orchestration.
//!
//! Each module owns one slice of the simulation. Commands mutate the store
//! and queue combat actions, the combat manager resolves rounds, and the
//! loot, progression and death services react to what the rounds produce.

pub mod attributes;
pub mod combat;
pub mod commands;
pub mod death;
pub mod loot;
pub mod progression;
pub mod snapshot;
pub mod spells;
