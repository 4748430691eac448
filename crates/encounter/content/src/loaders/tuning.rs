//! Encounter tuning loader.

use std::path::Path;

use anyhow::Context;
use encounter_core::EncounterTuning;

use super::LoadResult;

/// Loads orchestrator tuning from a TOML file.
///
/// ```toml
/// max_rounds = 25
/// pacing_millis = 400
/// defeat_gold_loss_percent = 20
/// ```
pub struct TuningLoader;

impl TuningLoader {
    pub fn load(path: &Path) -> LoadResult<EncounterTuning> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading tuning {}", path.display()))?;
        let tuning: EncounterTuning =
            toml::from_str(&text).with_context(|| format!("parsing tuning {}", path.display()))?;

        anyhow::ensure!(tuning.max_rounds > 0, "max_rounds must be positive");
        anyhow::ensure!(
            tuning.defeat_gold_loss_percent <= 100,
            "defeat_gold_loss_percent above 100"
        );
        Ok(tuning)
    }
}
