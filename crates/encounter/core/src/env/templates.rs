//! Enemy template definitions and oracle interface.
//!
//! Templates define everything needed to build an opposing combatant in
//! a data-driven way: attributes, resources, equipment, abilities, a
//! behavior archetype, and the reward profile paid out when the enemy is
//! defeated. The generator looks templates up by definition id (e.g.
//! "wolf", "bandit_scout").

use crate::policy::Archetype;
use crate::state::{Attributes, ItemId, WeaponProfile};
use crate::state::combatant::AbilityId;

/// Oracle providing enemy template data for roster generation.
pub trait EnemyOracle: Send + Sync {
    /// Returns the enemy template for a given definition id.
    fn template(&self, def_id: &str) -> Option<EnemyTemplate>;
}

/// One entry in an enemy's loot table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootEntry {
    pub item: ItemId,
    /// Independent drop chance, percent.
    pub chance: u32,
}

/// Reward paid out for defeating one enemy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RewardProfile {
    pub experience: u32,
    pub gold_min: u32,
    pub gold_max: u32,
    pub loot: Vec<LootEntry>,
}

/// Enemy template defining all combatant fields except identity and
/// starting band.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    pub name: String,
    pub max_health: u32,
    pub max_stamina: u32,
    pub max_resource: u32,
    pub attributes: Attributes,
    pub weapon: WeaponProfile,
    pub abilities: Vec<AbilityId>,
    pub archetype: Archetype,
    /// Personality flavor: shifts how eagerly the behavior policy
    /// reaches for abilities, percent delta on the archetype gate.
    #[cfg_attr(feature = "serde", serde(default))]
    pub aggression: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub reward: RewardProfile,
}
