//! Deterministic combat rules and data types shared across the runtime.
//!
//! `encounter-core` defines the canonical rules (actions, engine,
//! session state, behavior policy, encounter generation) and exposes
//! pure APIs reusable by the runtime and offline tools. All session
//! mutation flows through [`engine::CombatEngine`], and supporting
//! crates depend on the types re-exported here.

pub mod action;
pub mod combat;
pub mod config;
pub mod distance;
pub mod engine;
pub mod env;
pub mod policy;
pub mod spawn;
pub mod state;

pub use action::{ActionDetail, ActionError, ActionRecord, ActionReport, CombatAction};
pub use config::{EncounterTuning, EngineConfig};
pub use distance::{DistanceError, DistanceModel, MoveDirection, RangeBand};
pub use engine::{CombatEngine, CombatantSetup, EncounterSetup, StartError};
pub use env::{
    AbilityDef, AbilityEffect, AbilityOracle, AbilityRange, BalanceTables, CombatEnv, EnemyOracle,
    EnemyTemplate, ItemDef, ItemEffect, ItemOracle, LootEntry, OracleError, PcgRng, RewardProfile,
    RngOracle, TablesOracle, compute_seed, roll,
};
pub use policy::{Archetype, Situation, decide, decide_for_current};
pub use spawn::{
    DangerTier, EncounterKind, EncounterSpec, LocationContext, SkippedSlot, SpawnContext,
    SpawnError, SpawnReport, SpawnedEnemy, TimeOfDay, generate_encounter, should_spawn,
    spawn_enemies,
};
pub use state::{
    AbilityId, AbilitySlot, Attributes, CombatPhase, CombatSession, CombatantId, CombatantState,
    DamageType, InventorySlot, ItemId, Outcome, Resistances, ResourceMeter, StatusCategory,
    StatusEffect, StatusEffects, StatusKind, StatusTick, Team, WeaponProfile,
};
