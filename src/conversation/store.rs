//! The authoritative single-process conversation store.
//!
//! Holds conversations, messages, events, and the pending-message map behind
//! one lock so that concurrent workers can append to the same conversation
//! without losing entries. Cross-process persistence is out of scope by
//! design; the store's lifetime is the backend process's lifetime.

use std::collections::HashMap;
use std::sync::RwLock;

use mockable::Clock;
use serde::{Deserialize, Serialize};

use super::cache::FileCache;
use super::domain::{Conversation, ConversationId, Event, Message, MessageId};
use super::error::{StoreError, StoreResult};

/// A message whose agent response has been dispatched but not yet completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingMessage {
    /// The dispatched message.
    pub message_id: MessageId,
    /// A short status note for display.
    pub note: String,
}

#[derive(Debug, Default)]
struct StoreState {
    conversations: HashMap<ConversationId, Conversation>,
    conversation_order: Vec<ConversationId>,
    messages: HashMap<MessageId, Message>,
    events: Vec<Event>,
    pending: HashMap<MessageId, String>,
}

/// Thread-safe in-memory conversation store.
///
/// All mutation happens under a single write lock, which makes message
/// append atomic across the message map and the conversation's ordered id
/// list: two workers appending to the same conversation serialise on the
/// lock and neither entry is lost.
#[derive(Debug, Default)]
pub struct ConversationStore {
    state: RwLock<StoreState>,
    cache: FileCache,
}

impl ConversationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the file cache owned by this store.
    #[must_use]
    pub const fn cache(&self) -> &FileCache {
        &self.cache
    }

    /// Assigns a message id when absent.
    ///
    /// Runs exactly once per inbound message before persistence or
    /// dispatch; the operation is idempotent: an id, once set, is stable
    /// across repeated sanitisation. The conversation id is left exactly as
    /// the sending client supplied it.
    ///
    /// # Examples
    ///
    /// ```
    /// use switchboard::conversation::domain::{Message, Part, Role};
    /// use switchboard::conversation::store::ConversationStore;
    ///
    /// let message = Message::new(Role::User, vec![Part::text("hi")]).expect("valid");
    /// let sanitized = ConversationStore::sanitize(message);
    /// let id = sanitized.message_id().expect("assigned");
    /// let again = ConversationStore::sanitize(sanitized);
    /// assert_eq!(again.message_id(), Some(id));
    /// ```
    #[must_use]
    pub fn sanitize(mut message: Message) -> Message {
        if message.message_id().is_none() {
            message.metadata_mut().message_id = Some(MessageId::new());
        }
        message
    }

    /// Creates a new conversation and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LockPoisoned`] on a poisoned lock.
    pub fn create_conversation(&self, clock: &impl Clock) -> StoreResult<Conversation> {
        let conversation = Conversation::new(clock);
        let mut state = self.write()?;
        state
            .conversation_order
            .push(conversation.conversation_id());
        state
            .conversations
            .insert(conversation.conversation_id(), conversation.clone());
        Ok(conversation)
    }

    /// Looks up a conversation by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LockPoisoned`] on a poisoned lock.
    pub fn conversation(&self, id: ConversationId) -> StoreResult<Option<Conversation>> {
        Ok(self.read()?.conversations.get(&id).cloned())
    }

    /// Returns all conversations in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LockPoisoned`] on a poisoned lock.
    pub fn list_conversations(&self) -> StoreResult<Vec<Conversation>> {
        let state = self.read()?;
        Ok(state
            .conversation_order
            .iter()
            .filter_map(|id| state.conversations.get(id))
            .cloned()
            .collect())
    }

    /// Appends a sanitised message.
    ///
    /// The message body and the conversation's ordered id list are updated
    /// under one lock. A message whose metadata names an unknown (or no)
    /// conversation is still stored and retrievable by id; it is simply
    /// ungrouped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnsanitizedMessage`] when the message carries
    /// no id, [`StoreError::DuplicateMessage`] when the id is already
    /// stored, and [`StoreError::LockPoisoned`] on a poisoned lock.
    pub fn append_message(&self, message: &Message) -> StoreResult<()> {
        let message_id = message.message_id().ok_or(StoreError::UnsanitizedMessage)?;
        let mut state = self.write()?;

        if state.messages.contains_key(&message_id) {
            return Err(StoreError::DuplicateMessage(message_id));
        }

        state.messages.insert(message_id, message.clone());
        if let Some(conversation_id) = message.conversation_id()
            && let Some(conversation) = state.conversations.get_mut(&conversation_id)
        {
            conversation.record_message(message_id);
        }
        Ok(())
    }

    /// Looks up a message by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LockPoisoned`] on a poisoned lock.
    pub fn message(&self, id: MessageId) -> StoreResult<Option<Message>> {
        Ok(self.read()?.messages.get(&id).cloned())
    }

    /// Returns a conversation's messages in append order.
    ///
    /// An unknown conversation yields an empty list: the read path treats
    /// absence as "temporarily unavailable" rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LockPoisoned`] on a poisoned lock.
    pub fn messages_for(&self, conversation_id: ConversationId) -> StoreResult<Vec<Message>> {
        let state = self.read()?;
        let Some(conversation) = state.conversations.get(&conversation_id) else {
            return Ok(Vec::new());
        };
        Ok(conversation
            .message_ids()
            .iter()
            .filter_map(|id| state.messages.get(id))
            .cloned()
            .collect())
    }

    /// Records a backend event.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LockPoisoned`] on a poisoned lock.
    pub fn record_event(&self, event: Event) -> StoreResult<()> {
        self.write()?.events.push(event);
        Ok(())
    }

    /// Returns all recorded events in order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LockPoisoned`] on a poisoned lock.
    pub fn events(&self) -> StoreResult<Vec<Event>> {
        Ok(self.read()?.events.clone())
    }

    /// Marks a message as pending: dispatched but not yet completed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LockPoisoned`] on a poisoned lock.
    pub fn mark_pending(&self, message_id: MessageId, note: impl Into<String>) -> StoreResult<()> {
        self.write()?.pending.insert(message_id, note.into());
        Ok(())
    }

    /// Clears a message's pending marker.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LockPoisoned`] on a poisoned lock.
    pub fn clear_pending(&self, message_id: MessageId) -> StoreResult<()> {
        self.write()?.pending.remove(&message_id);
        Ok(())
    }

    /// Returns the currently pending messages.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LockPoisoned`] on a poisoned lock.
    pub fn pending_messages(&self) -> StoreResult<Vec<PendingMessage>> {
        Ok(self
            .read()?
            .pending
            .iter()
            .map(|(&message_id, note)| PendingMessage {
                message_id,
                note: note.clone(),
            })
            .collect())
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}
