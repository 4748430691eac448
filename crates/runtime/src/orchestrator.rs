//! High-level encounter orchestration.
//!
//! The orchestrator drives one encounter end to end: it starts the
//! state machine, pulls actions from providers turn by turn, narrates
//! around the suspension points, enforces the round cap, settles
//! rewards or penalties, and tears the session down. All engine
//! mutation stays synchronous; the only awaits are narrator calls,
//! pacing sleeps, and the cooperative pause check at round boundaries.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rand::RngCore;
use tokio::sync::watch;

use encounter_core::{
    ActionRecord, CombatAction, CombatEngine, CombatSession, CombatantId, CombatantSetup,
    EncounterSetup, EncounterSpec, EncounterTuning, Outcome, RewardProfile, SpawnContext, Team,
    spawn,
};
use serde::{Deserialize, Serialize};

use crate::api::{ActionProvider, PolicyProvider, Result, RuntimeError};
use crate::character::CharacterSheet;
use crate::events::{EncounterEvent, EventBus};
use crate::narrator::{NarrationResult, Narrator, SilentNarrator};
use crate::oracle::OracleManager;
use crate::rewards::{self, Penalty, Reward};
use crate::world::WorldContext;

/// Opening and closing flavor text for one encounter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrationBundle {
    pub opening: String,
    pub closing: String,
}

/// Consolidated result of one resolved encounter.
#[derive(Debug, Clone)]
pub struct EncounterResult {
    pub outcome: Outcome,
    pub rounds: u32,
    pub narration: NarrationBundle,
    pub reward: Option<Reward>,
    pub penalty: Option<Penalty>,
    pub log: Vec<ActionRecord>,
}

/// Pauses and resumes an orchestrator at round boundaries.
#[derive(Clone)]
pub struct PauseHandle {
    tx: watch::Sender<bool>,
}

impl PauseHandle {
    /// Request suspension before the next round's first action.
    pub fn pause(&self) {
        let _ = self.tx.send(true);
    }

    pub fn resume(&self) {
        let _ = self.tx.send(false);
    }

    pub fn is_paused(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Drives encounters from spawn to settlement.
pub struct Orchestrator {
    narrator: Arc<dyn Narrator>,
    events: EventBus,
    tuning: EncounterTuning,
    npc_provider: Box<dyn ActionProvider>,
    pause: watch::Sender<bool>,
}

impl Orchestrator {
    /// Create a new orchestrator builder.
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    /// Handle for pausing/resuming at round boundaries.
    pub fn pause_handle(&self) -> PauseHandle {
        PauseHandle {
            tx: self.pause.clone(),
        }
    }

    /// Subscribe to published events.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Roll the spawn check for the current location/frame and, when it
    /// passes, generate a full encounter spec.
    ///
    /// Skipped spawn slots are logged here; the core stays silent.
    pub fn check_for_encounter(
        &self,
        world: &dyn WorldContext,
        player_level: u32,
        oracles: &OracleManager,
    ) -> Result<Option<EncounterSpec>> {
        let ctx = SpawnContext {
            location: world.location(),
            time_of_day: world.time_of_day(),
            seed: world.seed(),
            frame: world.frame(),
        };
        let env = oracles.as_env();

        if !spawn::should_spawn(&ctx, &env)? {
            return Ok(None);
        }

        let spec = spawn::generate_encounter(&ctx, player_level, &env)?;
        if let Some(spec) = &spec {
            for skip in &spec.skipped {
                tracing::warn!(slot = skip.slot, error = %skip.error, "spawn slot skipped");
            }
        } else {
            tracing::debug!("spawn check passed but no enemies could be generated");
        }
        Ok(spec)
    }

    /// Drive one encounter end to end and return the consolidated
    /// result. See the module docs for the loop structure.
    pub async fn execute_combat(
        &self,
        sheet: &mut CharacterSheet,
        spec: &EncounterSpec,
        world: &mut dyn WorldContext,
        oracles: &OracleManager,
        player_provider: &dyn ActionProvider,
        reward_rng: &mut (dyn RngCore + Send),
    ) -> Result<EncounterResult> {
        let env = oracles.as_env();

        let mut combatants = vec![CombatantSetup {
            state: sheet.to_combatant(),
            starting_band: None,
        }];
        combatants.extend(spec.enemies.iter().map(|e| e.to_setup()));

        let reward_profiles: HashMap<CombatantId, RewardProfile> = spec
            .enemies
            .iter()
            .map(|e| (e.combatant.id, e.reward.clone()))
            .collect();

        let mut session = CombatEngine::start_combat(
            EncounterSetup {
                seed: world.seed(),
                combatants,
            },
            &env,
        )?;

        let opening = narration_or_empty(
            self.narrator.encounter_start(&sheet.name, spec).await,
            "encounter start",
        );
        self.events.publish(EncounterEvent::EncounterStarted {
            location: spec.location.clone(),
            kind: spec.kind,
            enemy_count: spec.enemies.len(),
        });

        let mut pause_rx = self.pause.subscribe();
        let mut last_round = session.round;
        let mut outcome = None;

        while session.is_active() {
            let actor = session.current_actor().ok_or(RuntimeError::NoCurrentActor)?;
            let player_controlled = session
                .combatant(actor)
                .ok_or(RuntimeError::MissingCombatant(actor))?
                .player_controlled;

            let action = if player_controlled {
                player_provider.provide_action(actor, &session, env).await?
            } else {
                self.npc_provider.provide_action(actor, &session, env).await?
            };

            let report = {
                let mut engine = CombatEngine::new(&mut session);
                match engine.process_action(actor, action, &env) {
                    Ok(report) => report,
                    Err(err) => {
                        // A provider handed us an illegal intent. The
                        // session is untouched; substitute a defend so
                        // the encounter always makes progress.
                        tracing::warn!(%actor, %err, "invalid action, substituting defend");
                        engine.process_action(actor, CombatAction::Defend, &env)?
                    }
                }
            };

            let acted_round = session.log.last().map(|r| r.round).unwrap_or(session.round);
            self.events.publish(EncounterEvent::TurnExecuted {
                round: acted_round,
                actor,
                action: report.detail.label().to_owned(),
            });

            if let Some(terminal) = report.termination {
                outcome = Some(terminal);
                break;
            }

            if session.round != last_round {
                let finished = last_round;
                last_round = session.round;

                self.narrate_round(&session, finished).await;

                if session.round > self.tuning.max_rounds {
                    outcome = Some(Outcome::Timeout);
                    break;
                }

                world.advance_time(self.tuning.round_time_cost);
                if self.tuning.pacing_millis > 0 {
                    tokio::time::sleep(Duration::from_millis(self.tuning.pacing_millis)).await;
                }
                // Cooperative pause: suspend before the next round's
                // first action, never mid-round.
                while *pause_rx.borrow() {
                    if pause_rx.changed().await.is_err() {
                        break;
                    }
                }
            }
        }

        let outcome = outcome.unwrap_or(Outcome::Timeout);
        let rounds = session.round;

        let closing = narration_or_empty(
            self.narrator.encounter_end(&sheet.name, outcome, spec).await,
            "encounter end",
        );

        // Sync surviving player resources back to the sheet before
        // settlement touches them.
        if let Some(player) = session
            .combatant(CombatantId::PLAYER)
            .or_else(|| session.defeated.iter().find(|c| c.id == CombatantId::PLAYER))
        {
            sheet.sync_after_combat(player);
        }

        let mut reward = None;
        let mut penalty = None;
        match outcome {
            Outcome::Victory => {
                let profiles: Vec<RewardProfile> = session
                    .defeated
                    .iter()
                    .filter(|c| c.team == Team::Enemies)
                    .filter_map(|c| reward_profiles.get(&c.id).cloned())
                    .collect();
                let rolled = rewards::roll_reward(&profiles, reward_rng);
                let levels_gained = rewards::apply_reward(sheet, &rolled);
                if levels_gained > 0 {
                    self.events.publish(EncounterEvent::LevelUp {
                        new_level: sheet.level,
                    });
                }
                reward = Some(rolled);
            }
            Outcome::Defeat => {
                let applied = rewards::apply_defeat(sheet, &self.tuning);
                if applied.gold_lost > 0 {
                    self.events.publish(EncounterEvent::GoldLost {
                        amount: applied.gold_lost,
                    });
                }
                penalty = Some(applied);
            }
            Outcome::Fled | Outcome::Timeout => {}
        }

        let log = CombatEngine::new(&mut session).end_combat();
        self.events.publish(EncounterEvent::EncounterEnded { outcome, rounds });

        Ok(EncounterResult {
            outcome,
            rounds,
            narration: NarrationBundle { opening, closing },
            reward,
            penalty,
            log,
        })
    }

    /// Best-effort per-round narration; failures degrade to silence.
    async fn narrate_round(&self, session: &CombatSession, finished: u32) {
        let records: Vec<ActionRecord> = session
            .log
            .iter()
            .filter(|r| r.round == finished)
            .cloned()
            .collect();
        match self.narrator.round(finished, &records).await {
            Ok(text) if !text.is_empty() => {
                tracing::debug!(round = finished, "{}", text);
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(round = finished, %err, "round narration failed");
            }
        }
    }
}

fn narration_or_empty(result: NarrationResult, stage: &str) -> String {
    match result {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(%err, "{} narration failed; continuing without flavor", stage);
            String::new()
        }
    }
}

/// Builder for [`Orchestrator`] with flexible configuration.
pub struct OrchestratorBuilder {
    narrator: Option<Arc<dyn Narrator>>,
    events: Option<EventBus>,
    tuning: Option<EncounterTuning>,
    npc_provider: Option<Box<dyn ActionProvider>>,
}

impl OrchestratorBuilder {
    fn new() -> Self {
        Self {
            narrator: None,
            events: None,
            tuning: None,
            npc_provider: None,
        }
    }

    /// Set the narration backend. Defaults to [`SilentNarrator`].
    pub fn narrator(mut self, narrator: Arc<dyn Narrator>) -> Self {
        self.narrator = Some(narrator);
        self
    }

    /// Inject the event bus. Defaults to a fresh bus.
    pub fn events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Override encounter tuning.
    pub fn tuning(mut self, tuning: EncounterTuning) -> Self {
        self.tuning = Some(tuning);
        self
    }

    /// Override the enemy-side provider. Defaults to [`PolicyProvider`].
    pub fn npc_provider(mut self, provider: impl ActionProvider + 'static) -> Self {
        self.npc_provider = Some(Box::new(provider));
        self
    }

    pub fn build(self) -> Orchestrator {
        let (pause, _) = watch::channel(false);
        Orchestrator {
            narrator: self.narrator.unwrap_or_else(|| Arc::new(SilentNarrator)),
            events: self.events.unwrap_or_default(),
            tuning: self.tuning.unwrap_or_default(),
            npc_provider: self
                .npc_provider
                .unwrap_or_else(|| Box::new(PolicyProvider::new())),
            pause,
        }
    }
}
