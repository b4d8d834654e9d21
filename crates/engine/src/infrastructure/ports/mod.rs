//! Port traits for infrastructure boundaries.
//!
//! These are the only abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Store access (in-memory or SQLite)
//! - Read-only content (spells, item templates, affixes)
//! - Pushing events to connections
//! - Clock/Random (for testing)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::*;

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::BroadcastPort;

#[cfg(test)]
pub use external::MockBroadcastPort;

// =============================================================================
// Testability Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

#[cfg(test)]
pub use testing::{MockClockPort, MockRandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::RepoError;
