//! Content factory for loading all encounter data from a directory.

use std::path::{Path, PathBuf};

use encounter_core::{AbilityDef, BalanceTables, EncounterTuning, EnemyTemplate, ItemDef};

use super::{
    AbilityLoader, EnemyLoader, ItemLoader, LoadResult, TablesLoader, TuningLoader,
};

/// Content factory that loads all encounter data from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── tables.toml
/// ├── tuning.toml
/// ├── abilities.ron
/// ├── items.ron
/// └── enemies.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load balance tables from `tables.toml`.
    pub fn load_tables(&self) -> LoadResult<BalanceTables> {
        TablesLoader::load(&self.data_dir.join("tables.toml"))
    }

    /// Load encounter tuning from `tuning.toml`.
    pub fn load_tuning(&self) -> LoadResult<EncounterTuning> {
        TuningLoader::load(&self.data_dir.join("tuning.toml"))
    }

    /// Load the ability catalog from `abilities.ron`.
    pub fn load_abilities(&self) -> LoadResult<Vec<AbilityDef>> {
        AbilityLoader::load(&self.data_dir.join("abilities.ron"))
    }

    /// Load the item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<ItemDef>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Load the enemy template catalog from `enemies.ron`.
    pub fn load_enemies(&self) -> LoadResult<Vec<(String, EnemyTemplate)>> {
        EnemyLoader::load(&self.data_dir.join("enemies.ron"))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn shipped_data_directory_loads() {
        let factory = ContentFactory::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../../../data"));

        let tables = factory.load_tables().unwrap();
        assert_eq!(tables.flee.max_attempts, 3);

        let enemies = factory.load_enemies().unwrap();
        assert!(enemies.iter().any(|(id, _)| id == "wolf"));

        let abilities = factory.load_abilities().unwrap();
        let items = factory.load_items().unwrap();
        let tuning = factory.load_tuning().unwrap();

        // Every ability an enemy knows must exist in the catalog.
        for (_, template) in &enemies {
            for ability in &template.abilities {
                assert!(abilities.iter().any(|def| def.id == *ability));
            }
        }
        // Every loot drop must be a real item.
        for (_, template) in &enemies {
            for entry in &template.reward.loot {
                assert!(items.iter().any(|def| def.id == entry.item));
            }
        }
        assert!(tuning.max_rounds > 0);
    }
}
