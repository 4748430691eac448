//! Enemy template catalog loader.

use std::path::Path;

use anyhow::Context;
use encounter_core::EnemyTemplate;

use super::LoadResult;

/// Loads the enemy template catalog from a RON file.
///
/// # File Format
///
/// A RON list of `(id, template)` pairs:
///
/// ```ron
/// [
///     ("wolf", (
///         name: "Wolf",
///         max_health: 20,
///         max_stamina: 30,
///         max_resource: 0,
///         attributes: (attack_bonus: 1),
///         weapon: (name: "bite", damage: 4, range: Melee, damage_type: Physical),
///         abilities: [],
///         archetype: Aggressive,
///         aggression: 10,
///         reward: (experience: 25, gold_min: 2, gold_max: 8, loot: []),
///     )),
/// ]
/// ```
pub struct EnemyLoader;

impl EnemyLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<(String, EnemyTemplate)>> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading enemy catalog {}", path.display()))?;
        let entries: Vec<(String, EnemyTemplate)> = ron::from_str(&text)
            .with_context(|| format!("parsing enemy catalog {}", path.display()))?;

        for (id, template) in &entries {
            anyhow::ensure!(
                template.reward.gold_min <= template.reward.gold_max,
                "enemy '{}' has gold_min > gold_max",
                id
            );
            anyhow::ensure!(
                template.reward.loot.iter().all(|e| e.chance <= 100),
                "enemy '{}' has a loot chance above 100%",
                id
            );
        }
        Ok(entries)
    }
}
