//! Nightfall Engine library.
//!
//! Server-side simulation core of the Nightfall MUD: command handling,
//! room-scoped combat rounds, and the services that react to their results.
//!
//! ## Structure
//!
//! - `use_cases/` - Commands, combat, and the loot/progression/death/spell services
//! - `content/` - Read-only reference data and the Haven world seed
//! - `infrastructure/` - Ports plus the in-memory and SQLite stores
//! - `api/` - HTTP and WebSocket entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod content;
pub mod infrastructure;
pub mod use_cases;

/// Test fixtures module for unit and scenario tests.
#[cfg(test)]
pub mod test_fixtures;

/// Scenario tests driving the whole engine over the in-memory store.
#[cfg(test)]
mod e2e_tests;

pub use app::{GameEngine, Repositories};
