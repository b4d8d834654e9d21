//! Round-based combat: per-room instances driven by one global scheduler.

mod instance;
mod manager;
mod round;

pub use instance::{ActionVerb, ActiveStatus, CombatInstance, CombatantId, QueuedAction};
pub use manager::CombatManager;
pub use round::{Battlefield, RoundReport, RoundResolver};

use thiserror::Error;

use crate::infrastructure::ports::RepoError;

#[derive(Debug, Error)]
pub enum CombatError {
    #[error(transparent)]
    Repo(#[from] RepoError),
}
