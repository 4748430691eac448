//! Balance table loader.

use std::path::Path;

use anyhow::Context;
use encounter_core::BalanceTables;

use super::LoadResult;

/// Loads balance tables from a TOML file.
///
/// Every section and field is optional; omitted values fall back to the
/// shipped defaults, so a tuning file only names what it changes:
///
/// ```toml
/// [hit]
/// base = 70
///
/// [flee]
/// max_attempts = 2
/// ```
pub struct TablesLoader;

impl TablesLoader {
    pub fn load(path: &Path) -> LoadResult<BalanceTables> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading balance tables {}", path.display()))?;
        let tables: BalanceTables = toml::from_str(&text)
            .with_context(|| format!("parsing balance tables {}", path.display()))?;

        anyhow::ensure!(
            tables.hit.min <= tables.hit.max && tables.hit.max <= 100,
            "hit clamp [{}, {}] is not a valid percent range",
            tables.hit.min,
            tables.hit.max
        );
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_files_keep_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[hit]\nbase = 70\n").unwrap();

        let tables = TablesLoader::load(file.path()).unwrap();
        assert_eq!(tables.hit.base, 70);
        assert_eq!(tables.hit.max, 95);
        assert_eq!(tables.flee.max_attempts, 3);
    }

    #[test]
    fn rejects_inverted_hit_clamp() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[hit]\nmin = 80\nmax = 20\n").unwrap();

        assert!(TablesLoader::load(file.path()).is_err());
    }
}
