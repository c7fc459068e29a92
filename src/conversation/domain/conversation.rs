//! Conversation aggregate: an ordered sequence of messages in one session.

use super::{ConversationId, MessageId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A conversation owned by the store.
///
/// Holds the ordered message-id list; message bodies live in the store's
/// message map. Mutated only through append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    conversation_id: ConversationId,
    name: String,
    is_active: bool,
    message_ids: Vec<MessageId>,
    created_at: DateTime<Utc>,
}

impl Conversation {
    /// Creates a new active conversation with an empty display name.
    #[must_use]
    pub fn new(clock: &impl Clock) -> Self {
        Self {
            conversation_id: ConversationId::new(),
            name: String::new(),
            is_active: true,
            message_ids: Vec::new(),
            created_at: clock.utc(),
        }
    }

    /// Returns the conversation identifier.
    #[must_use]
    pub const fn conversation_id(&self) -> ConversationId {
        self.conversation_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` while the conversation accepts new messages.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the ordered message identifiers.
    #[must_use]
    pub fn message_ids(&self) -> &[MessageId] {
        &self.message_ids
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Appends a message id, ignoring ids already recorded.
    pub fn record_message(&mut self, message_id: MessageId) {
        if !self.message_ids.contains(&message_id) {
            self.message_ids.push(message_id);
        }
    }
}
