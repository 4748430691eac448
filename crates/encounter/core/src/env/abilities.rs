//! Ability definitions and oracle interface.

use crate::distance::RangeBand;
use crate::state::{AbilityId, DamageType};
use crate::state::status::StatusKind;

/// Oracle providing ability definitions by id.
pub trait AbilityOracle: Send + Sync {
    /// Returns the ability definition if the id is known.
    fn definition(&self, id: AbilityId) -> Option<AbilityDef>;
}

/// Range requirement of an ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityRange {
    /// Usable out to the given band (closer is always in range).
    Band(RangeBand),
    /// Bypasses the range check entirely.
    Any,
}

/// One declared effect of an ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityEffect {
    /// Damage routed through the target's resistance pipeline.
    Damage { amount: u32, damage_type: DamageType },
    /// Restores the target's health.
    Heal { amount: u32 },
    /// Attaches a status effect to the target (buffs target the caster's
    /// side, debuffs the opposing side; the policy decides the target).
    Status {
        kind: StatusKind,
        magnitude: i32,
        rounds: u8,
    },
}

impl AbilityEffect {
    /// True for effects that hurt the target.
    pub fn is_offensive(&self) -> bool {
        matches!(
            self,
            AbilityEffect::Damage { .. }
                | AbilityEffect::Status {
                    kind: StatusKind::AttackDown | StatusKind::DefenseDown | StatusKind::Poison,
                    ..
                }
        )
    }

    /// True for effects that restore health, now or over time.
    pub fn is_healing(&self) -> bool {
        matches!(
            self,
            AbilityEffect::Heal { .. }
                | AbilityEffect::Status {
                    kind: StatusKind::Regeneration,
                    ..
                }
        )
    }
}

/// Complete specification of one ability.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityDef {
    pub id: AbilityId,
    pub name: String,
    /// Resource pool cost to use.
    pub cost: u32,
    /// Rounds of cooldown started after use.
    pub cooldown: u8,
    pub range: AbilityRange,
    pub effects: Vec<AbilityEffect>,
}

impl AbilityDef {
    /// True if any declared effect is offensive.
    pub fn is_offensive(&self) -> bool {
        self.effects.iter().any(AbilityEffect::is_offensive)
    }

    /// True if any declared effect heals.
    pub fn is_healing(&self) -> bool {
        self.effects.iter().any(AbilityEffect::is_healing)
    }
}
