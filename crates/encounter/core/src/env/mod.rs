//! Traits describing injected read-only collaborators.
//!
//! Oracles expose balance tables, ability/item/enemy definitions, and
//! deterministic randomness. The [`CombatEnv`] aggregate bundles them so
//! the engine can access everything it needs without hard coupling to
//! concrete implementations.

mod abilities;
mod items;
mod rng;
mod tables;
mod templates;

pub use abilities::{AbilityDef, AbilityEffect, AbilityOracle, AbilityRange};
pub use items::{ItemDef, ItemEffect, ItemOracle};
pub use rng::{PcgRng, RngOracle, compute_seed, roll};
pub use tables::{
    BalanceTables, DamageParams, DefendParams, FleeParams, HitParams, InitiativeParams,
    SpawnParams, StaminaParams, TablesOracle,
};
pub use templates::{EnemyOracle, EnemyTemplate, LootEntry, RewardProfile};

/// Errors raised when a required oracle is missing from the environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("tables oracle not available")]
    TablesNotAvailable,

    #[error("ability oracle not available")]
    AbilitiesNotAvailable,

    #[error("item oracle not available")]
    ItemsNotAvailable,

    #[error("enemy oracle not available")]
    EnemiesNotAvailable,

    #[error("rng oracle not available")]
    RngNotAvailable,
}

/// Aggregates read-only oracles required by the engine, policy, and
/// generator.
///
/// Each slot is optional so tests can run with exactly the oracles a
/// path needs; accessors fail with a typed [`OracleError`] when a
/// required oracle was not provided.
#[derive(Clone, Copy)]
pub struct CombatEnv<'a> {
    tables: Option<&'a dyn TablesOracle>,
    abilities: Option<&'a dyn AbilityOracle>,
    items: Option<&'a dyn ItemOracle>,
    enemies: Option<&'a dyn EnemyOracle>,
    rng: Option<&'a dyn RngOracle>,
}

impl<'a> CombatEnv<'a> {
    pub fn new(
        tables: Option<&'a dyn TablesOracle>,
        abilities: Option<&'a dyn AbilityOracle>,
        items: Option<&'a dyn ItemOracle>,
        enemies: Option<&'a dyn EnemyOracle>,
        rng: Option<&'a dyn RngOracle>,
    ) -> Self {
        Self {
            tables,
            abilities,
            items,
            enemies,
            rng,
        }
    }

    pub fn with_all(
        tables: &'a dyn TablesOracle,
        abilities: &'a dyn AbilityOracle,
        items: &'a dyn ItemOracle,
        enemies: &'a dyn EnemyOracle,
        rng: &'a dyn RngOracle,
    ) -> Self {
        Self::new(
            Some(tables),
            Some(abilities),
            Some(items),
            Some(enemies),
            Some(rng),
        )
    }

    pub fn empty() -> Self {
        Self {
            tables: None,
            abilities: None,
            items: None,
            enemies: None,
            rng: None,
        }
    }

    /// Returns the TablesOracle, or an error if not available.
    pub fn tables(&self) -> Result<&'a dyn TablesOracle, OracleError> {
        self.tables.ok_or(OracleError::TablesNotAvailable)
    }

    /// Returns the AbilityOracle, or an error if not available.
    pub fn abilities(&self) -> Result<&'a dyn AbilityOracle, OracleError> {
        self.abilities.ok_or(OracleError::AbilitiesNotAvailable)
    }

    /// Returns the ItemOracle, or an error if not available.
    pub fn items(&self) -> Result<&'a dyn ItemOracle, OracleError> {
        self.items.ok_or(OracleError::ItemsNotAvailable)
    }

    /// Returns the EnemyOracle, or an error if not available.
    pub fn enemies(&self) -> Result<&'a dyn EnemyOracle, OracleError> {
        self.enemies.ok_or(OracleError::EnemiesNotAvailable)
    }

    /// Returns the RngOracle, or an error if not available.
    pub fn rng(&self) -> Result<&'a dyn RngOracle, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }
}

impl std::fmt::Debug for CombatEnv<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatEnv")
            .field("tables", &self.tables.is_some())
            .field("abilities", &self.abilities.is_some())
            .field("items", &self.items.is_some())
            .field("enemies", &self.enemies.is_some())
            .field("rng", &self.rng.is_some())
            .finish()
    }
}
