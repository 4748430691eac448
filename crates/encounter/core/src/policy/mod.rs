//! Archetype-driven behavior policy.
//!
//! [`decide`] is a pure function from a situational snapshot to one
//! action intent: no state survives between calls, and every roll it
//! makes is seeded from the session, so the same encounter replays to
//! the same decisions.
//!
//! Priority order is fixed across archetypes (flee, heal, ability,
//! move, attack); each archetype fills those slots differently.

mod archetypes;

use crate::action::CombatAction;
use crate::env::CombatEnv;
use crate::state::{CombatSession, CombatantState};

pub use archetypes::decide;

/// Named behavior profile parameterizing the policy's decisions.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Archetype {
    /// Closes distance, burns abilities, picks on the weakest.
    Aggressive,
    /// Keeps its guard up and retreats from melee when hurt.
    Defensive,
    /// Middle of the road; fights at its weapon's preferred band.
    Balanced,
    /// Heals early and often.
    Support,
    /// Runs when the fight turns; fights reluctantly otherwise.
    Coward,
}

impl Archetype {
    /// Percent chance of reaching for an ability instead of attacking.
    pub(crate) fn ability_gate(self) -> i32 {
        match self {
            Archetype::Aggressive => 70,
            Archetype::Balanced => 40,
            Archetype::Support => 30,
            Archetype::Defensive | Archetype::Coward => 20,
        }
    }

    /// HP percentage below which this archetype looks for healing.
    pub(crate) fn heal_threshold(self) -> u32 {
        match self {
            Archetype::Support | Archetype::Defensive => 50,
            _ => 25,
        }
    }
}

/// Situational snapshot a decision is made from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Situation {
    pub hp_percent: u32,
    pub stamina_percent: u32,
    pub living_allies: usize,
    pub living_enemies: usize,
}

impl Situation {
    /// Observes the snapshot for one combatant.
    ///
    /// "Allies" and "enemies" are relative to the observer's team.
    pub fn observe(actor: &CombatantState, session: &CombatSession) -> Self {
        Self {
            hp_percent: actor.health.percent(),
            stamina_percent: actor.stamina.percent(),
            living_allies: session.living_count(actor.team),
            living_enemies: session.living_count(actor.team.opposing()),
        }
    }

    /// True when the opposing side outnumbers the observer's side.
    pub fn outnumbered(&self) -> bool {
        self.living_enemies > self.living_allies
    }
}

/// Convenience: decide for whichever combatant the turn belongs to.
///
/// Returns `None` when the session is not active or the current actor
/// is missing from the roster.
pub fn decide_for_current(session: &CombatSession, env: &CombatEnv<'_>) -> Option<CombatAction> {
    let actor = session.current_actor()?;
    let state = session.combatant(actor)?;
    Some(decide(state, session, env))
}
