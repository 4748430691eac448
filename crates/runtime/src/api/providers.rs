//! Asynchronous abstraction for sourcing combatant intent.
//!
//! The orchestrator pulls one action per turn from an
//! [`ActionProvider`]: the player-decision hook for the player side
//! (which may consult UI, scripts, or a narrator before answering) and
//! the behavior policy for everyone else.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use encounter_core::{CombatAction, CombatEnv, CombatSession, CombatantId, decide};

use super::errors::{Result, RuntimeError};

/// Trait for providing actions based on the current session state.
///
/// Different implementations can handle:
/// - Player input (from UI/CLI)
/// - Policy-driven enemy decisions
/// - Scripted/replayed actions for tests
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Provide an action for the given combatant.
    ///
    /// The session is a read-only snapshot; the returned intent is
    /// validated by the engine, not trusted.
    async fn provide_action(
        &self,
        actor: CombatantId,
        session: &CombatSession,
        env: CombatEnv<'_>,
    ) -> Result<CombatAction>;
}

/// Provider backed by the archetype behavior policy.
///
/// Stateless; the policy reads everything it needs from the session
/// snapshot and the environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyProvider;

impl PolicyProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActionProvider for PolicyProvider {
    async fn provide_action(
        &self,
        actor: CombatantId,
        session: &CombatSession,
        env: CombatEnv<'_>,
    ) -> Result<CombatAction> {
        let state = session
            .combatant(actor)
            .ok_or(RuntimeError::MissingCombatant(actor))?;
        Ok(decide(state, session, &env))
    }
}

/// Provider that replays a fixed action sequence, then falls back to
/// Defend. Testing fixture.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    actions: Mutex<VecDeque<CombatAction>>,
}

impl ScriptedProvider {
    pub fn new(actions: impl IntoIterator<Item = CombatAction>) -> Self {
        Self {
            actions: Mutex::new(actions.into_iter().collect()),
        }
    }
}

#[async_trait]
impl ActionProvider for ScriptedProvider {
    async fn provide_action(
        &self,
        _actor: CombatantId,
        _session: &CombatSession,
        _env: CombatEnv<'_>,
    ) -> Result<CombatAction> {
        let mut actions = self
            .actions
            .lock()
            .map_err(|_| RuntimeError::Provider("scripted action queue poisoned".to_owned()))?;
        Ok(actions.pop_front().unwrap_or(CombatAction::Defend))
    }
}
