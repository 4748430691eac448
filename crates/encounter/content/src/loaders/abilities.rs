//! Ability catalog loader.

use std::path::Path;

use anyhow::Context;
use encounter_core::AbilityDef;

use super::LoadResult;

/// Loads the ability catalog from a RON file.
///
/// # File Format
///
/// A RON list of ability definitions:
///
/// ```ron
/// [
///     (
///         id: (1),
///         name: "Firebolt",
///         cost: 8,
///         cooldown: 2,
///         range: Band(Medium),
///         effects: [Damage(amount: 12, damage_type: Fire)],
///     ),
/// ]
/// ```
pub struct AbilityLoader;

impl AbilityLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<AbilityDef>> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading ability catalog {}", path.display()))?;
        let defs: Vec<AbilityDef> = ron::from_str(&text)
            .with_context(|| format!("parsing ability catalog {}", path.display()))?;

        // Duplicate ids would make oracle lookups ambiguous.
        let mut seen = std::collections::HashSet::new();
        for def in &defs {
            anyhow::ensure!(
                seen.insert(def.id),
                "duplicate ability id {:?} ('{}')",
                def.id,
                def.name
            );
        }
        Ok(defs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_a_minimal_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                (
                    id: (1),
                    name: "Firebolt",
                    cost: 8,
                    cooldown: 2,
                    range: Band(Medium),
                    effects: [Damage(amount: 12, damage_type: Fire)],
                ),
                (
                    id: (2),
                    name: "Mend",
                    cost: 6,
                    cooldown: 1,
                    range: Any,
                    effects: [Heal(amount: 10)],
                ),
            ]"#
        )
        .unwrap();

        let defs = AbilityLoader::load(file.path()).unwrap();
        assert_eq!(defs.len(), 2);
        assert!(defs[0].is_offensive());
        assert!(defs[1].is_healing());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                (id: (1), name: "A", cost: 0, cooldown: 0, range: Any, effects: []),
                (id: (1), name: "B", cost: 0, cooldown: 0, range: Any, effects: []),
            ]"#
        )
        .unwrap();

        assert!(AbilityLoader::load(file.path()).is_err());
    }
}
