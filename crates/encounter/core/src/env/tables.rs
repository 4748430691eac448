//! Balance tables: every tunable number in the combat math.
//!
//! The engine never hardcodes a probability or cost; formulas pull their
//! parameters from a [`TablesOracle`] so balance passes are data edits,
//! not code edits. Defaults reproduce the shipped tuning.

/// Oracle providing balance parameters to formulas and the engine.
pub trait TablesOracle: Send + Sync {
    fn balance(&self) -> &BalanceTables;
}

/// Complete set of balance parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BalanceTables {
    pub hit: HitParams,
    pub damage: DamageParams,
    pub flee: FleeParams,
    pub stamina: StaminaParams,
    pub initiative: InitiativeParams,
    pub defend: DefendParams,
    pub spawn: SpawnParams,
}

impl TablesOracle for BalanceTables {
    fn balance(&self) -> &BalanceTables {
        self
    }
}

/// Hit chance parameters, in integer percent.
///
/// ```text
/// hit = base + per_attack_bonus·attack − per_defense_bonus·defense − dodge
/// clamped to [min, max]
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HitParams {
    pub base: i32,
    pub per_attack_bonus: i32,
    pub per_defense_bonus: i32,
    pub min: u32,
    pub max: u32,
}

impl Default for HitParams {
    fn default() -> Self {
        Self {
            base: 75,
            per_attack_bonus: 2,
            per_defense_bonus: 2,
            min: 10,
            max: 95,
        }
    }
}

/// Damage pipeline parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DamageParams {
    /// Chance (percent) of a critical hit, rolled independently of the
    /// hit roll.
    pub crit_chance: u32,
    /// Multiplier applied to damage on a critical.
    pub crit_multiplier: u32,
    /// Damage never drops below this after resistance reduction.
    pub minimum: u32,
}

impl Default for DamageParams {
    fn default() -> Self {
        Self {
            crit_chance: 10,
            crit_multiplier: 2,
            minimum: 1,
        }
    }
}

/// Flee attempt parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FleeParams {
    /// Success chance (percent) of the first attempt.
    pub base: u32,
    /// Added to the chance per prior attempt this encounter.
    pub per_attempt: u32,
    /// Attempts beyond this are rejected outright.
    pub max_attempts: u8,
}

impl Default for FleeParams {
    fn default() -> Self {
        Self {
            base: 50,
            per_attempt: 10,
            max_attempts: 3,
        }
    }
}

/// Stamina economy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StaminaParams {
    /// Cost of a one-band move.
    pub move_cost: u32,
    /// Regenerated by every survivor when a new round starts.
    pub regen_per_round: u32,
}

impl Default for StaminaParams {
    fn default() -> Self {
        Self {
            move_cost: 10,
            regen_per_round: 5,
        }
    }
}

/// Initiative roll parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InitiativeParams {
    /// Sides of the uniform die added to the initiative attribute.
    pub die: u32,
}

impl Default for InitiativeParams {
    fn default() -> Self {
        Self { die: 20 }
    }
}

/// Defend action parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DefendParams {
    /// Defense bonus granted for one round.
    pub defense_bonus: i32,
}

impl Default for DefendParams {
    fn default() -> Self {
        Self { defense_bonus: 5 }
    }
}

/// Encounter spawn parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpawnParams {
    /// Base spawn chance (percent) before multipliers.
    pub base_chance: u32,
    /// Percent multipliers by danger tier, indexed
    /// safe/low/medium/high/deadly. 100 means ×1.
    pub danger_multiplier: [u32; 5],
    /// Percent multiplier applied at night. 100 means ×1.
    pub night_multiplier: u32,
    /// Base enemy count by danger tier, same indexing.
    pub enemy_count: [u32; 5],
    /// One extra enemy per this many player levels.
    pub levels_per_extra_enemy: u32,
    /// Roster size cap regardless of scaling.
    pub max_enemies: u32,
    /// Percent weights for ambush/patrol/lair encounter kinds; the
    /// remainder is a chance encounter.
    pub kind_weights: [u32; 3],
}

impl Default for SpawnParams {
    fn default() -> Self {
        Self {
            base_chance: 15,
            danger_multiplier: [0, 80, 100, 130, 170],
            night_multiplier: 150,
            enemy_count: [0, 1, 2, 3, 4],
            levels_per_extra_enemy: 5,
            max_enemies: 4,
            kind_weights: [15, 25, 20],
        }
    }
}
