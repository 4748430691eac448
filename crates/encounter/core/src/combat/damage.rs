//! Damage calculation and application.

use crate::env::TablesOracle;
use crate::state::{DamageType, Resistances};

/// Calculate final damage for a landed attack.
///
/// # Formula
///
/// ```text
/// base = weapon_damage + attack_bonus
/// if critical: base *= crit_multiplier
/// reduced = base − base·resistance% / 100
/// final = max(reduced, minimum)
/// ```
pub fn calculate_damage(
    weapon_damage: u32,
    attack_bonus: i32,
    damage_type: DamageType,
    resistances: &Resistances,
    is_critical: bool,
    tables: &(impl TablesOracle + ?Sized),
) -> u32 {
    let params = tables.balance().damage;

    let mut base = weapon_damage.saturating_add(attack_bonus.max(0) as u32);

    if is_critical {
        base *= params.crit_multiplier;
    }

    resisted(base, damage_type, resistances, params.minimum)
}

/// Route a raw damage amount through the resistance pipeline.
///
/// Used for both weapon hits and ability damage so resistances apply
/// uniformly.
pub fn resisted(
    amount: u32,
    damage_type: DamageType,
    resistances: &Resistances,
    minimum: u32,
) -> u32 {
    let resist = resistances.against(damage_type).min(100);
    let reduced = amount - amount * resist / 100;
    reduced.max(minimum)
}
