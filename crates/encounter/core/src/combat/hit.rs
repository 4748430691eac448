//! Hit chance calculation.

use crate::env::TablesOracle;

/// Calculate hit chance for an attack, in integer percent.
///
/// # Formula
///
/// ```text
/// hit = base + per_attack·attack_bonus − per_defense·defense_bonus − dodge
/// clamped to [min, max]
/// ```
///
/// The clamp guarantees an attack can always miss and always land no
/// matter how lopsided the attribute spread is.
pub fn hit_chance(
    attack_bonus: i32,
    defense_bonus: i32,
    dodge: u32,
    tables: &(impl TablesOracle + ?Sized),
) -> u32 {
    let params = tables.balance().hit;

    let chance = params.base + params.per_attack_bonus * attack_bonus
        - params.per_defense_bonus * defense_bonus
        - dodge as i32;

    chance.clamp(params.min as i32, params.max as i32) as u32
}

/// Check whether an attack hits for a given d100 roll (1-100).
pub fn check_hit(
    attack_bonus: i32,
    defense_bonus: i32,
    dodge: u32,
    roll: u32,
    tables: &(impl TablesOracle + ?Sized),
) -> bool {
    roll <= hit_chance(attack_bonus, defense_bonus, dodge, tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::BalanceTables;

    #[test]
    fn hit_chance_clamps_for_any_magnitude() {
        let tables = BalanceTables::default();

        for attack in [-1000, -50, 0, 3, 50, 1000] {
            for defense in [-1000, -50, 0, 3, 50, 1000] {
                for dodge in [0, 10, 100, 10_000] {
                    let chance = hit_chance(attack, defense, dodge, &tables);
                    assert!((10..=95).contains(&chance), "chance {} out of clamp", chance);
                }
            }
        }
    }

    #[test]
    fn baseline_matchup_uses_base_chance() {
        let tables = BalanceTables::default();
        assert_eq!(hit_chance(0, 0, 0, &tables), 75);
        assert_eq!(hit_chance(3, 0, 0, &tables), 81);
        assert_eq!(hit_chance(0, 3, 10, &tables), 59);
    }
}
