//! Phase: one provisioned round of an event's bracket ladder.

use serde::{Deserialize, Serialize};

/// Identifier of an event (externally provisioned).
pub type EventId = u64;

/// Identifier of a phase (externally provisioned).
pub type PhaseId = u64;

/// One round of the bracket. Phases are provisioned outside the engine and only looked up by `order`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub id: PhaseId,
    pub event_id: EventId,
    pub name: String,
    /// 0 is the earliest round; the final carries the configured maximum order.
    pub order: u32,
}

impl Phase {
    pub fn new(id: PhaseId, event_id: EventId, name: impl Into<String>, order: u32) -> Self {
        Self {
            id,
            event_id,
            name: name.into(),
            order,
        }
    }
}
