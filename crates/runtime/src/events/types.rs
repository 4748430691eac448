//! Lifecycle notifications published by the orchestrator.

use serde::{Deserialize, Serialize};

use encounter_core::{CombatantId, EncounterKind, Outcome};

/// Fire-and-forget lifecycle events for external logging/replay.
///
/// Ordering-insensitive from the engine's perspective; consumers that
/// need strict ordering should sort on `round`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EncounterEvent {
    EncounterStarted {
        location: String,
        kind: EncounterKind,
        enemy_count: usize,
    },
    TurnExecuted {
        round: u32,
        actor: CombatantId,
        action: String,
    },
    EncounterEnded {
        outcome: Outcome,
        rounds: u32,
    },
    LevelUp {
        new_level: u32,
    },
    GoldLost {
        amount: u32,
    },
}
