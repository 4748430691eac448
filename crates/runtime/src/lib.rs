//! Runtime orchestration for the encounter engine.
//!
//! This crate wires the pure rules in `encounter-core` into a running
//! game: asynchronous action providers, the best-effort narrator port,
//! a topic-based event bus, oracle management over loaded content, and
//! the [`Orchestrator`] that drives one encounter end to end.
//!
//! Modules are organized by responsibility:
//! - [`orchestrator`] hosts the encounter driver and its builder
//! - [`api`] exposes the provider abstraction and error types
//! - [`events`] provides the topic-based event bus
//! - [`narrator`] is the async flavor-text port
//! - [`oracle`] adapts loaded content to the core oracle traits
//! - [`world`] and [`character`] model the externally owned session
//!   context and player sheet

pub mod api;
pub mod character;
pub mod events;
pub mod narrator;
pub mod oracle;
pub mod orchestrator;
pub mod rewards;
pub mod world;

pub use api::{ActionProvider, PolicyProvider, Result, RuntimeError, ScriptedProvider};
pub use character::CharacterSheet;
pub use events::{EncounterEvent, EventBus, Topic};
pub use narrator::{Narrator, NarratorError, SilentNarrator};
pub use oracle::OracleManager;
pub use orchestrator::{
    EncounterResult, NarrationBundle, Orchestrator, OrchestratorBuilder, PauseHandle,
};
pub use rewards::{Penalty, Reward};
pub use world::{SessionContext, WorldContext};
