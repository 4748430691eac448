//! Flee chance calculation.

use crate::env::TablesOracle;

/// Success chance (percent) of a flee attempt.
///
/// Each failed attempt this encounter raises the next attempt's odds:
///
/// ```text
/// chance = base + per_attempt · prior_attempts
/// ```
///
/// capped so a roll can still fail while attempts remain.
pub fn flee_chance(prior_attempts: u8, tables: &(impl TablesOracle + ?Sized)) -> u32 {
    let params = tables.balance().flee;
    (params.base + params.per_attempt * prior_attempts as u32).min(95)
}

/// Whether a flee attempt is still permitted.
pub fn flee_permitted(prior_attempts: u8, tables: &(impl TablesOracle + ?Sized)) -> bool {
    prior_attempts < tables.balance().flee.max_attempts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::BalanceTables;

    #[test]
    fn chance_escalates_per_attempt() {
        let tables = BalanceTables::default();
        assert_eq!(flee_chance(0, &tables), 50);
        assert_eq!(flee_chance(1, &tables), 60);
        assert_eq!(flee_chance(2, &tables), 70);
    }

    #[test]
    fn attempts_are_capped() {
        let tables = BalanceTables::default();
        assert!(flee_permitted(2, &tables));
        assert!(!flee_permitted(3, &tables));
    }
}
