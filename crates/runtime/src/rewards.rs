//! Reward and penalty settlement.
//!
//! Victory rewards are rolled per defeated enemy on a caller-injected
//! RNG: fixed experience, a bounded gold range, and independent
//! per-item drop rolls from the enemy's loot table. Defeat costs a
//! configured fraction of carried gold and leaves the player at an HP
//! floor rather than healed.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use encounter_core::{EncounterTuning, ItemId, ResourceMeter, RewardProfile};

use crate::character::CharacterSheet;

/// Spoils of a won encounter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub experience: u32,
    pub gold: u32,
    pub loot: Vec<ItemId>,
}

/// Cost of a lost encounter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Penalty {
    pub gold_lost: u32,
}

/// Roll the consolidated reward for a set of defeated enemies.
pub fn roll_reward(profiles: &[RewardProfile], rng: &mut (dyn RngCore + Send)) -> Reward {
    let mut reward = Reward::default();

    for profile in profiles {
        reward.experience += profile.experience;
        if profile.gold_max > 0 {
            reward.gold += rng.gen_range(profile.gold_min..=profile.gold_max);
        }
        for entry in &profile.loot {
            if rng.gen_range(1..=100) <= entry.chance {
                reward.loot.push(entry.item);
            }
        }
    }

    reward
}

/// Apply a victory reward to the player sheet.
///
/// Returns the number of levels gained.
pub fn apply_reward(sheet: &mut CharacterSheet, reward: &Reward) -> u32 {
    sheet.add_gold(reward.gold);
    for &item in &reward.loot {
        sheet.add_item(item, 1);
    }
    sheet.add_experience(reward.experience)
}

/// Apply defeat penalties to the player sheet.
///
/// The player loses a fraction of carried gold and is propped up to
/// the configured HP floor: alive, not healed. Relocation to safety is
/// the caller's responsibility.
pub fn apply_defeat(sheet: &mut CharacterSheet, tuning: &EncounterTuning) -> Penalty {
    let gold_lost = sheet.remove_gold(sheet.gold * tuning.defeat_gold_loss_percent / 100);

    let floor = tuning.defeat_hp_floor.min(sheet.health.maximum);
    sheet.health = ResourceMeter::new(sheet.health.current.max(floor), sheet.health.maximum);

    Penalty { gold_lost }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encounter_core::LootEntry;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn profile() -> RewardProfile {
        RewardProfile {
            experience: 25,
            gold_min: 2,
            gold_max: 8,
            loot: vec![
                LootEntry {
                    item: ItemId(1),
                    chance: 100,
                },
                LootEntry {
                    item: ItemId(2),
                    chance: 0,
                },
            ],
        }
    }

    #[test]
    fn gold_stays_in_declared_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let reward = roll_reward(&[profile()], &mut rng);
            assert!((2..=8).contains(&reward.gold));
            assert_eq!(reward.experience, 25);
        }
    }

    #[test]
    fn loot_rolls_respect_chances() {
        let mut rng = StdRng::seed_from_u64(2);
        let reward = roll_reward(&[profile()], &mut rng);
        assert_eq!(reward.loot, vec![ItemId(1)]);
    }

    #[test]
    fn defeat_floors_hp_and_taxes_gold() {
        let mut sheet = CharacterSheet::new("tester");
        sheet.add_gold(40);
        sheet.health = ResourceMeter::new(0, 100);

        let penalty = apply_defeat(&mut sheet, &EncounterTuning::default());
        assert_eq!(penalty.gold_lost, 10);
        assert_eq!(sheet.gold, 30);
        assert_eq!(sheet.health.current, 10);

        // A healthier survivor is not dragged down to the floor.
        sheet.health = ResourceMeter::new(55, 100);
        apply_defeat(&mut sheet, &EncounterTuning::default());
        assert_eq!(sheet.health.current, 55);
    }
}
