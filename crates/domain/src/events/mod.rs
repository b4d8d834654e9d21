//! Domain Events
//!
//! Coarse-grained events representing significant state changes in the
//! simulation. They travel over the engine's event bus to decoupled
//! side-effect services (loot, progression).

mod combat_events;

pub use combat_events::*;
