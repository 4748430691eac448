//! Status effect system for combatants.
//!
//! Status effects are temporary, round-scoped modifiers: flat bonuses or
//! penalties to attributes, plus periodic health drain or recovery.
//!
//! # Round-based Duration
//!
//! Effects store `remaining_rounds` and the round they were applied in.
//! An effect applied in round N is not ticked during round N, so a
//! one-round buff (defend) covers the full set of opposing turns before
//! expiring.

use arrayvec::ArrayVec;

use crate::config::EngineConfig;

/// Active status effects on a combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { EngineConfig::MAX_STATUS_EFFECTS }>,
}

/// A single timed modifier attached to a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Strength of the modifier: attribute delta for buffs/debuffs,
    /// per-round amount for periodic effects.
    pub magnitude: i32,
    /// Rounds left before the effect expires.
    pub remaining_rounds: u8,
    /// Round the effect was applied in. Effects do not tick during the
    /// round they were applied.
    pub applied_round: u32,
}

/// Types of status effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    /// Flat bonus to effective attack.
    AttackUp,
    /// Flat bonus to effective defense.
    DefenseUp,
    /// Flat penalty to effective attack.
    AttackDown,
    /// Flat penalty to effective defense.
    DefenseDown,
    /// HP recovery each round.
    Regeneration,
    /// HP loss each round.
    Poison,
}

/// Coarse classification used by policies and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusCategory {
    Buff,
    Debuff,
    HealOverTime,
    DamageOverTime,
}

impl StatusKind {
    pub fn category(self) -> StatusCategory {
        match self {
            StatusKind::AttackUp | StatusKind::DefenseUp => StatusCategory::Buff,
            StatusKind::AttackDown | StatusKind::DefenseDown => StatusCategory::Debuff,
            StatusKind::Regeneration => StatusCategory::HealOverTime,
            StatusKind::Poison => StatusCategory::DamageOverTime,
        }
    }
}

/// Result of one round of status ticking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusTick {
    /// Total HP drained by damage-over-time effects this tick.
    pub damage: u32,
    /// Total HP restored by heal-over-time effects this tick.
    pub healing: u32,
}

impl StatusEffects {
    /// Creates an empty status effect set.
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    /// Checks if a specific status effect is active.
    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Adds a status effect.
    ///
    /// If the same kind is already present, the stronger magnitude wins
    /// and the duration extends to the later expiration.
    pub fn add(&mut self, kind: StatusKind, magnitude: i32, rounds: u8, applied_round: u32) {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
            existing.magnitude = if magnitude.abs() > existing.magnitude.abs() {
                magnitude
            } else {
                existing.magnitude
            };
            existing.remaining_rounds = existing.remaining_rounds.max(rounds);
            existing.applied_round = applied_round;
            return;
        }

        if !self.effects.is_full() {
            self.effects.push(StatusEffect {
                kind,
                magnitude,
                remaining_rounds: rounds,
                applied_round,
            });
        }
    }

    /// Removes a status effect immediately.
    pub fn remove(&mut self, kind: StatusKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    /// Ticks every effect that predates `current_round`: applies periodic
    /// amounts, decrements durations, and drops expired entries.
    pub fn tick(&mut self, current_round: u32) -> StatusTick {
        let mut result = StatusTick::default();

        for effect in self.effects.iter_mut() {
            if effect.applied_round >= current_round {
                continue;
            }
            match effect.kind.category() {
                StatusCategory::DamageOverTime => {
                    result.damage += effect.magnitude.unsigned_abs();
                }
                StatusCategory::HealOverTime => {
                    result.healing += effect.magnitude.unsigned_abs();
                }
                StatusCategory::Buff | StatusCategory::Debuff => {}
            }
            effect.remaining_rounds = effect.remaining_rounds.saturating_sub(1);
        }

        self.effects
            .retain(|e| e.remaining_rounds > 0 || e.applied_round >= current_round);

        result
    }

    /// Sum of magnitudes for effects matching `kind`.
    pub fn magnitude_of(&self, kind: StatusKind) -> i32 {
        self.effects
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.magnitude)
            .sum()
    }

    /// Net attack modifier from active effects.
    pub fn attack_modifier(&self) -> i32 {
        self.magnitude_of(StatusKind::AttackUp) - self.magnitude_of(StatusKind::AttackDown).abs()
    }

    /// Net defense modifier from active effects.
    pub fn defense_modifier(&self) -> i32 {
        self.magnitude_of(StatusKind::DefenseUp) - self.magnitude_of(StatusKind::DefenseDown).abs()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_applied_this_round_does_not_tick() {
        let mut statuses = StatusEffects::empty();
        statuses.add(StatusKind::DefenseUp, 5, 1, 3);

        statuses.tick(3);
        assert!(statuses.has(StatusKind::DefenseUp));

        statuses.tick(4);
        assert!(!statuses.has(StatusKind::DefenseUp));
    }

    #[test]
    fn periodic_effects_accumulate() {
        let mut statuses = StatusEffects::empty();
        statuses.add(StatusKind::Poison, 4, 3, 1);
        statuses.add(StatusKind::Regeneration, 2, 3, 1);

        let tick = statuses.tick(2);
        assert_eq!(tick.damage, 4);
        assert_eq!(tick.healing, 2);
    }

    #[test]
    fn stronger_magnitude_wins_on_refresh() {
        let mut statuses = StatusEffects::empty();
        statuses.add(StatusKind::AttackUp, 2, 2, 1);
        statuses.add(StatusKind::AttackUp, 5, 1, 1);

        assert_eq!(statuses.magnitude_of(StatusKind::AttackUp), 5);
    }
}
