//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};

use super::types::EncounterEvent;

/// Topics for event routing.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Encounter lifecycle: started, turns, ended.
    Encounter,
    /// Player progression: level-ups, currency changes.
    Progression,
}

impl EncounterEvent {
    pub fn topic(&self) -> Topic {
        match self {
            EncounterEvent::EncounterStarted { .. }
            | EncounterEvent::TurnExecuted { .. }
            | EncounterEvent::EncounterEnded { .. } => Topic::Encounter,
            EncounterEvent::LevelUp { .. } | EncounterEvent::GoldLost { .. } => Topic::Progression,
        }
    }
}

/// Topic-based event bus.
///
/// Injected into the orchestrator so the engine carries no process-wide
/// state; consumers subscribe to the topics they care about. Publishing
/// is fire-and-forget.
pub struct EventBus {
    channels: Arc<RwLock<HashMap<Topic, broadcast::Sender<EncounterEvent>>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic.
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut channels = HashMap::new();

        channels.insert(Topic::Encounter, broadcast::channel(capacity).0);
        channels.insert(Topic::Progression, broadcast::channel(capacity).0);

        Self {
            channels: Arc::new(RwLock::new(channels)),
        }
    }

    /// Publish an event to its corresponding topic.
    ///
    /// Best-effort: a missing subscriber or contended lock drops the
    /// event rather than blocking combat resolution.
    pub fn publish(&self, event: EncounterEvent) {
        let topic = event.topic();

        match self.channels.try_read() {
            Ok(channels) => {
                if let Some(tx) = channels.get(&topic)
                    && tx.send(event).is_err()
                {
                    // No subscribers for this topic - normal, not an error.
                    tracing::trace!("no subscribers for topic {:?}", topic);
                }
            }
            Err(_) => {
                tracing::debug!("event bus contended; dropping event for topic {:?}", topic);
            }
        }
    }

    /// Subscribe to a specific topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<EncounterEvent> {
        let channels = self
            .channels
            .try_read()
            .expect("event channels read lock poisoned");
        channels
            .get(&topic)
            .expect("topic channel not initialized")
            .subscribe()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
