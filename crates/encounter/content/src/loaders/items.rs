//! Item catalog loader.

use std::path::Path;

use anyhow::Context;
use encounter_core::ItemDef;

use super::LoadResult;

/// Loads the item catalog from a RON file.
///
/// # File Format
///
/// ```ron
/// [
///     (
///         id: (1),
///         name: "Healing Draught",
///         consumable: true,
///         effects: [RestoreHealth(25)],
///         value: 15,
///     ),
/// ]
/// ```
pub struct ItemLoader;

impl ItemLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<ItemDef>> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading item catalog {}", path.display()))?;
        let defs: Vec<ItemDef> = ron::from_str(&text)
            .with_context(|| format!("parsing item catalog {}", path.display()))?;

        let mut seen = std::collections::HashSet::new();
        for def in &defs {
            anyhow::ensure!(
                seen.insert(def.id),
                "duplicate item id {:?} ('{}')",
                def.id,
                def.name
            );
        }
        Ok(defs)
    }
}
