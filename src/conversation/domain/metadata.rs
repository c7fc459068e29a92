//! Message metadata: identity and processing context carried with a message.

use super::{ConversationId, MessageId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

fn is_false(value: &bool) -> bool {
    !*value
}

/// Metadata associated with a message.
///
/// Identity travels here rather than as struct fields because inbound wire
/// messages may legitimately lack ids until the store's sanitize step runs.
/// After sanitize, `message_id` is always populated; `conversation_id` is
/// whatever the sending client supplied.
///
/// # Examples
///
/// ```
/// use switchboard::conversation::domain::{ConversationId, MessageMetadata};
///
/// let conversation_id = ConversationId::new();
/// let metadata = MessageMetadata::for_conversation(conversation_id);
/// assert_eq!(metadata.conversation_id, Some(conversation_id));
/// assert!(metadata.message_id.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageMetadata {
    /// The conversation this message belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<ConversationId>,

    /// The message identifier, once assigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<MessageId>,

    /// A file reference propagated alongside the message (e.g. an upload
    /// accompanying the request).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_reference: Option<String>,

    /// Marks a client-side optimistic upload placeholder. The reconciler
    /// preserves such messages until the server reflects them.
    #[serde(default, skip_serializing_if = "is_false")]
    pub file_upload: bool,

    /// Explicit caller override of the routing decision: the named agent is
    /// used for this turn and pinned to the session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_agent: Option<String>,

    /// Extension data for custom metadata fields.
    ///
    /// **Warning:** Due to `#[serde(flatten)]`, any JSON keys not matching
    /// known fields during deserialisation land here. Avoid extension keys
    /// that collide with the typed field names above.
    #[serde(flatten, skip_serializing_if = "HashMap::is_empty")]
    pub extensions: HashMap<String, Value>,
}

impl MessageMetadata {
    /// Creates empty metadata.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates metadata bound to a conversation.
    #[must_use]
    pub fn for_conversation(conversation_id: ConversationId) -> Self {
        Self {
            conversation_id: Some(conversation_id),
            ..Self::default()
        }
    }

    /// Sets the message identifier.
    #[must_use]
    #[expect(
        clippy::missing_const_for_fn,
        reason = "Option::Some with Copy type should be const but isn't stable"
    )]
    pub fn with_message_id(mut self, message_id: MessageId) -> Self {
        self.message_id = Some(message_id);
        self
    }

    /// Sets the propagated file reference.
    #[must_use]
    pub fn with_file_reference(mut self, reference: impl Into<String>) -> Self {
        self.file_reference = Some(reference.into());
        self
    }

    /// Marks this message as an optimistic upload placeholder.
    #[must_use]
    pub const fn marked_file_upload(mut self) -> Self {
        self.file_upload = true;
        self
    }

    /// Sets an explicit remote-agent override.
    #[must_use]
    pub fn with_remote_agent(mut self, agent: impl Into<String>) -> Self {
        self.remote_agent = Some(agent.into());
        self
    }

    /// Adds an extension field.
    #[must_use]
    pub fn with_extension(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    /// Returns `true` if no fields are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conversation_id.is_none()
            && self.message_id.is_none()
            && self.file_reference.is_none()
            && !self.file_upload
            && self.remote_agent.is_none()
            && self.extensions.is_empty()
    }
}
