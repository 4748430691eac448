//! Engine capacity limits and encounter-level policy values.

/// Compile-time capacity limits for per-combatant collections.
///
/// These bound the fixed-capacity vectors in combatant state so sessions
/// have a known maximum footprint.
#[derive(Clone, Copy, Debug, Default)]
pub struct EngineConfig;

impl EngineConfig {
    /// Maximum abilities a combatant can know.
    pub const MAX_ABILITIES: usize = 8;

    /// Maximum concurrent status effects per combatant.
    pub const MAX_STATUS_EFFECTS: usize = 8;

    /// Maximum inventory slots per combatant.
    pub const MAX_INVENTORY_SLOTS: usize = 12;
}

/// Policy values the orchestrator layers on top of the state machine.
///
/// These are deliberately not part of [`crate::env::BalanceTables`]: the
/// tables tune the combat math, while this tunes how an encounter is
/// driven and settled around it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncounterTuning {
    /// Hard ceiling on rounds before the encounter times out.
    pub max_rounds: u32,
    /// World-clock ticks consumed per completed round.
    pub round_time_cost: u64,
    /// Optional pause between rounds for observed play, in milliseconds.
    /// Zero disables pacing.
    pub pacing_millis: u64,
    /// Percentage of current gold lost on defeat.
    pub defeat_gold_loss_percent: u32,
    /// HP the player is restored to after a defeat. Never a full heal.
    pub defeat_hp_floor: u32,
}

impl Default for EncounterTuning {
    fn default() -> Self {
        Self {
            max_rounds: 20,
            round_time_cost: 5,
            pacing_millis: 0,
            defeat_gold_loss_percent: 25,
            defeat_hp_floor: 10,
        }
    }
}
