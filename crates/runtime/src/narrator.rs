//! Asynchronous narration port.
//!
//! Narration is pure flavor: the orchestrator requests it around
//! suspension points, but a failing or absent narrator never blocks
//! combat resolution. Implementations typically call out to an LLM or
//! template service and may take arbitrarily long.

use async_trait::async_trait;

use encounter_core::{ActionRecord, EncounterSpec, Outcome};

/// Failure produced by a narrator backend.
#[derive(Debug, Clone, thiserror::Error)]
#[error("narrator backend failed: {0}")]
pub struct NarratorError(pub String);

pub type NarrationResult = std::result::Result<String, NarratorError>;

/// Text-producing collaborator for encounter flavor.
#[async_trait]
pub trait Narrator: Send + Sync {
    /// Narrate the moment an encounter begins.
    async fn encounter_start(&self, player_name: &str, spec: &EncounterSpec) -> NarrationResult;

    /// Narrate one resolved round of actions.
    async fn round(&self, round: u32, records: &[ActionRecord]) -> NarrationResult;

    /// Narrate the encounter's resolution.
    async fn encounter_end(
        &self,
        player_name: &str,
        outcome: Outcome,
        spec: &EncounterSpec,
    ) -> NarrationResult;
}

/// Narrator that produces no text. Default when flavor is not wanted.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNarrator;

#[async_trait]
impl Narrator for SilentNarrator {
    async fn encounter_start(&self, _player_name: &str, spec: &EncounterSpec) -> NarrationResult {
        // The generator's synthesized line is a serviceable fallback.
        Ok(spec.description.clone())
    }

    async fn round(&self, _round: u32, _records: &[ActionRecord]) -> NarrationResult {
        Ok(String::new())
    }

    async fn encounter_end(
        &self,
        _player_name: &str,
        _outcome: Outcome,
        _spec: &EncounterSpec,
    ) -> NarrationResult {
        Ok(String::new())
    }
}
