//! Backend event log entries.
//!
//! The backend records one event for every message it accepts or produces,
//! giving clients a flat activity feed across conversations.

use super::{EventId, Message};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A recorded backend event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    event_id: EventId,
    actor: String,
    content: Message,
    timestamp: DateTime<Utc>,
}

impl Event {
    /// Creates a new event.
    #[must_use]
    pub fn new(actor: impl Into<String>, content: Message, clock: &impl Clock) -> Self {
        Self {
            event_id: EventId::new(),
            actor: actor.into(),
            content,
            timestamp: clock.utc(),
        }
    }

    /// Returns the event identifier.
    #[must_use]
    pub const fn event_id(&self) -> EventId {
        self.event_id
    }

    /// Returns the actor that produced the event.
    #[must_use]
    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// Returns the message content attached to the event.
    #[must_use]
    pub const fn content(&self) -> &Message {
        &self.content
    }

    /// Returns the event timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
