//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the core engine, oracles, and action providers
//! so clients can bubble them up with consistent context.

use thiserror::Error;

use encounter_core::{ActionError, CombatantId, OracleError, StartError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to start combat")]
    Start(#[from] StartError),

    #[error("action rejected")]
    Action(#[from] ActionError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("no current actor while the session reports active")]
    NoCurrentActor,

    #[error("combatant {0} vanished from the session roster")]
    MissingCombatant(CombatantId),

    #[error("action provider failed: {0}")]
    Provider(String),
}
