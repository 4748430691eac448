//! Authoritative per-encounter session state.

use crate::action::ActionRecord;
use crate::distance::DistanceModel;
use crate::state::combatant::CombatantState;
use crate::state::common::{CombatantId, Team};

/// Terminal outcome of an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Victory,
    Defeat,
    Fled,
    Timeout,
}

/// Lifecycle phase of a combat session.
///
/// `Idle → Active → Ended(outcome)`; the round counter and turn index
/// for the active phase live on [`CombatSession`] directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatPhase {
    Idle,
    Active,
    Ended(Outcome),
}

/// Complete state for one encounter: roster, turn order, positioning,
/// round bookkeeping, and the action log.
///
/// Created by `start_combat`, mutated exclusively through the engine,
/// torn down by `end_combat`. Nothing here outlives the encounter.
#[derive(Clone, Debug)]
pub struct CombatSession {
    pub phase: CombatPhase,
    /// Session seed all deterministic rolls derive from.
    pub seed: u64,

    pub roster: Vec<CombatantState>,
    /// Combatants removed at zero HP, kept for reward settlement.
    pub defeated: Vec<CombatantState>,

    /// Initiative order, computed once at start and only ever filtered.
    pub turn_order: Vec<CombatantId>,
    pub round: u32,
    pub turn_index: usize,

    /// Flee attempts made this encounter (successful ones end it).
    pub flee_attempts: u8,
    /// Monotonic action counter, part of every combat roll seed.
    pub nonce: u64,

    pub distance: DistanceModel,
    pub log: Vec<ActionRecord>,
}

impl CombatSession {
    /// True while actions can still be processed.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == CombatPhase::Active
    }

    /// Terminal outcome, if the session has ended.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            CombatPhase::Ended(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Looks up a living or dead roster member.
    pub fn combatant(&self, id: CombatantId) -> Option<&CombatantState> {
        self.roster.iter().find(|c| c.id == id)
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut CombatantState> {
        self.roster.iter_mut().find(|c| c.id == id)
    }

    /// The combatant whose turn it is, while active.
    pub fn current_actor(&self) -> Option<CombatantId> {
        if !self.is_active() {
            return None;
        }
        self.turn_order.get(self.turn_index).copied()
    }

    /// Living combatants on a team.
    pub fn living_on(&self, team: Team) -> impl Iterator<Item = &CombatantState> {
        self.roster
            .iter()
            .filter(move |c| c.team == team && c.is_alive())
    }

    pub fn living_count(&self, team: Team) -> usize {
        self.living_on(team).count()
    }
}
