//! The Message type: the atomic unit of conversation history.
//!
//! Message content is immutable once persisted; metadata may be augmented
//! (the sanitize step assigns a message id exactly once when absent).

use super::{ConversationId, MessageId, MessageMetadata, Part, Role};
use serde::{Deserialize, Serialize};

/// A message within a conversation.
///
/// # Invariants
///
/// - `parts` contains at least one part (enforced at construction)
/// - content never changes after construction; only metadata is augmented
///
/// # Examples
///
/// ```
/// use switchboard::conversation::domain::{Message, Part, Role};
///
/// let message = Message::new(Role::User, vec![Part::text("Hello!")])
///     .expect("valid message");
/// assert_eq!(message.role(), Role::User);
/// assert!(message.message_id().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message source.
    role: Role,

    /// The ordered content parts of this message.
    parts: Vec<Part>,

    /// Associated metadata, including identity.
    #[serde(default)]
    metadata: MessageMetadata,
}

impl Message {
    /// Creates a new message with empty metadata.
    ///
    /// # Errors
    ///
    /// Returns [`MessageBuilderError::EmptyParts`] if `parts` is empty.
    pub fn new(role: Role, parts: Vec<Part>) -> Result<Self, MessageBuilderError> {
        if parts.is_empty() {
            return Err(MessageBuilderError::EmptyParts);
        }
        Ok(Self {
            role,
            parts,
            metadata: MessageMetadata::empty(),
        })
    }

    /// Returns a builder for constructing messages with metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// use switchboard::conversation::domain::{
    ///     ConversationId, Message, MessageMetadata, Part, Role,
    /// };
    ///
    /// let message = Message::builder(Role::Agent)
    ///     .with_part(Part::text("Done."))
    ///     .with_metadata(MessageMetadata::for_conversation(ConversationId::new()))
    ///     .build()
    ///     .expect("valid message");
    /// assert!(message.conversation_id().is_some());
    /// ```
    #[must_use]
    pub fn builder(role: Role) -> MessageBuilder {
        MessageBuilder::new(role)
    }

    /// Returns the message role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the content parts.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Returns the metadata.
    #[must_use]
    pub const fn metadata(&self) -> &MessageMetadata {
        &self.metadata
    }

    /// Returns a mutable reference to the metadata.
    ///
    /// Metadata is the only mutable surface of a message; content parts are
    /// fixed at construction.
    pub fn metadata_mut(&mut self) -> &mut MessageMetadata {
        &mut self.metadata
    }

    /// Returns the message identifier, if one has been assigned.
    #[must_use]
    pub const fn message_id(&self) -> Option<MessageId> {
        self.metadata.message_id
    }

    /// Returns the conversation identifier, if the metadata carries one.
    #[must_use]
    pub const fn conversation_id(&self) -> Option<ConversationId> {
        self.metadata.conversation_id
    }

    /// Concatenates the text parts of this message, newline-separated.
    ///
    /// File and data parts are skipped; routing and placeholder matching
    /// operate on the textual content only.
    #[must_use]
    pub fn text_content(&self) -> String {
        self.parts
            .iter()
            .filter_map(Part::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Replaces the content parts wholesale.
    ///
    /// Reserved for read-path rewriting (the file cache substitutes inline
    /// payloads with references on an outgoing copy); stored messages are
    /// never rewritten in place.
    pub(crate) fn replace_parts(&mut self, parts: Vec<Part>) {
        debug_assert!(!parts.is_empty(), "messages must keep at least one part");
        self.parts = parts;
    }
}

/// Builder for constructing messages with full control over all fields.
#[derive(Debug)]
pub struct MessageBuilder {
    role: Role,
    parts: Vec<Part>,
    metadata: MessageMetadata,
}

impl MessageBuilder {
    /// Creates a new message builder.
    #[must_use]
    pub fn new(role: Role) -> Self {
        Self {
            role,
            parts: Vec::new(),
            metadata: MessageMetadata::empty(),
        }
    }

    /// Adds a content part.
    #[must_use]
    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Adds multiple content parts.
    #[must_use]
    pub fn with_parts(mut self, parts: impl IntoIterator<Item = Part>) -> Self {
        self.parts.extend(parts);
        self
    }

    /// Sets the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: MessageMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Builds the message.
    ///
    /// # Errors
    ///
    /// Returns [`MessageBuilderError::EmptyParts`] if no parts were added.
    pub fn build(self) -> Result<Message, MessageBuilderError> {
        if self.parts.is_empty() {
            return Err(MessageBuilderError::EmptyParts);
        }
        Ok(Message {
            role: self.role,
            parts: self.parts,
            metadata: self.metadata,
        })
    }
}

/// Errors that can occur when building a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageBuilderError {
    /// The message has no content parts.
    #[error("message must contain at least one part")]
    EmptyParts,
}
