//! Oracle management: adapts loaded content to the core oracle traits.

use std::collections::HashMap;

use encounter_content::ContentFactory;
use encounter_core::{
    AbilityDef, AbilityId, AbilityOracle, BalanceTables, CombatEnv, EncounterTuning,
    EnemyOracle, EnemyTemplate, ItemDef, ItemId, ItemOracle, PcgRng, TablesOracle,
};

/// Owns all loaded content and exposes it through the core oracle
/// traits. One instance serves any number of encounters.
pub struct OracleManager {
    tables: BalanceTables,
    tuning: EncounterTuning,
    abilities: HashMap<AbilityId, AbilityDef>,
    items: HashMap<ItemId, ItemDef>,
    enemies: HashMap<String, EnemyTemplate>,
    rng: PcgRng,
}

impl OracleManager {
    /// Builds a manager from already-loaded values.
    pub fn new(
        tables: BalanceTables,
        tuning: EncounterTuning,
        abilities: Vec<AbilityDef>,
        items: Vec<ItemDef>,
        enemies: Vec<(String, EnemyTemplate)>,
    ) -> Self {
        Self {
            tables,
            tuning,
            abilities: abilities.into_iter().map(|d| (d.id, d)).collect(),
            items: items.into_iter().map(|d| (d.id, d)).collect(),
            enemies: enemies.into_iter().collect(),
            rng: PcgRng,
        }
    }

    /// Loads everything from a content directory.
    pub fn from_content(factory: &ContentFactory) -> encounter_content::LoadResult<Self> {
        Ok(Self::new(
            factory.load_tables()?,
            factory.load_tuning()?,
            factory.load_abilities()?,
            factory.load_items()?,
            factory.load_enemies()?,
        ))
    }

    /// Manager with default tables and empty catalogs, for tests and
    /// minimal embeddings.
    pub fn with_defaults() -> Self {
        Self::new(
            BalanceTables::default(),
            EncounterTuning::default(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        )
    }

    pub fn tuning(&self) -> &EncounterTuning {
        &self.tuning
    }

    /// Bundles the oracles for a core call.
    pub fn as_env(&self) -> CombatEnv<'_> {
        CombatEnv::with_all(self, self, self, self, &self.rng)
    }
}

impl TablesOracle for OracleManager {
    fn balance(&self) -> &BalanceTables {
        &self.tables
    }
}

impl AbilityOracle for OracleManager {
    fn definition(&self, id: AbilityId) -> Option<AbilityDef> {
        self.abilities.get(&id).cloned()
    }
}

impl ItemOracle for OracleManager {
    fn definition(&self, id: ItemId) -> Option<ItemDef> {
        self.items.get(&id).cloned()
    }
}

impl EnemyOracle for OracleManager {
    fn template(&self, def_id: &str) -> Option<EnemyTemplate> {
        self.enemies.get(def_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_lookups_return_none() {
        let manager = OracleManager::with_defaults();
        assert!(AbilityOracle::definition(&manager, AbilityId(1)).is_none());
        assert!(ItemOracle::definition(&manager, ItemId(1)).is_none());
        assert!(manager.template("wolf").is_none());
    }
}
