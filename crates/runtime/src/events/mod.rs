//! Topic-based event publishing for the telemetry/replay layer.

mod bus;
mod types;

pub use bus::{EventBus, Topic};
pub use types::EncounterEvent;
