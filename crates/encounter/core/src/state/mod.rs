//! Session and combatant state types.

pub mod combatant;
pub mod common;
pub mod session;
pub mod status;

pub use combatant::{
    AbilityId, AbilitySlot, Attributes, CombatantState, InventorySlot, ItemId, Resistances,
    WeaponProfile,
};
pub use common::{CombatantId, DamageType, ResourceMeter, Team};
pub use session::{CombatPhase, CombatSession, Outcome};
pub use status::{StatusCategory, StatusEffect, StatusEffects, StatusKind, StatusTick};
