//! World/session context consumed by the orchestrator.
//!
//! The engine does not own the world: location, time of day, the
//! session seed, and the frame counter all belong to the surrounding
//! game session and are reached through this trait.

use encounter_core::{LocationContext, TimeOfDay};

/// Externally owned session context.
pub trait WorldContext: Send {
    /// Where the player currently is.
    fn location(&self) -> &LocationContext;

    /// Coarse clock classification.
    fn time_of_day(&self) -> TimeOfDay;

    /// Session seed for deterministic rolls.
    fn seed(&self) -> u64;

    /// Monotonically increasing frame counter for spawn rolls.
    fn frame(&self) -> u64;

    /// Advance the game clock by a number of ticks.
    fn advance_time(&mut self, ticks: u64);
}

/// Plain in-memory context for tests and single-session embeddings.
#[derive(Clone, Debug)]
pub struct SessionContext {
    pub location: LocationContext,
    pub time_of_day: TimeOfDay,
    pub seed: u64,
    pub clock: u64,
    frame: u64,
}

impl SessionContext {
    pub fn new(location: LocationContext, time_of_day: TimeOfDay, seed: u64) -> Self {
        Self {
            location,
            time_of_day,
            seed,
            clock: 0,
            frame: 0,
        }
    }
}

impl WorldContext for SessionContext {
    fn location(&self) -> &LocationContext {
        &self.location
    }

    fn time_of_day(&self) -> TimeOfDay {
        self.time_of_day
    }

    fn seed(&self) -> u64 {
        self.seed
    }

    fn frame(&self) -> u64 {
        self.frame
    }

    fn advance_time(&mut self, ticks: u64) {
        self.clock += ticks;
        self.frame += 1;
    }
}
