//! Error types for the conversation store and file cache.
//!
//! Uses `thiserror` for typed variants that callers can inspect; lock
//! poisoning is surfaced as an error rather than a panic.

use super::cache::CacheId;
use super::domain::{ConversationId, MessageId};
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The conversation was not found.
    #[error("conversation not found: {0}")]
    ConversationNotFound(ConversationId),

    /// The message carries no identifier; it must be sanitised before it
    /// can be persisted or tracked.
    #[error("message has no identifier; sanitize before appending")]
    UnsanitizedMessage,

    /// A message with this identifier is already stored.
    #[error("duplicate message: {0}")]
    DuplicateMessage(MessageId),

    /// The internal lock was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Result type for file-cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors that can occur during file-cache operations.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// No entry exists for the given cache identifier.
    #[error("cached file not found: {0}")]
    NotFound(CacheId),

    /// The inline payload could not be decoded.
    #[error("invalid file payload in message {message_id} part {index}: {reason}")]
    InvalidPayload {
        /// The message carrying the payload.
        message_id: MessageId,
        /// The part index within the message.
        index: usize,
        /// Description of the decode failure.
        reason: String,
    },

    /// The internal lock was poisoned by a panicking writer.
    #[error("cache lock poisoned: {0}")]
    LockPoisoned(String),
}
