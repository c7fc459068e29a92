//! Envelope types: methods, requests, responses, and shared payloads.

use serde::{Deserialize, Serialize};

use crate::conversation::domain::{ConversationId, MessageId};

/// Method names accepted by the backend.
pub mod methods {
    /// Create a conversation.
    pub const CONVERSATION_CREATE: &str = "conversation/create";
    /// List all conversations.
    pub const CONVERSATION_LIST: &str = "conversation/list";
    /// Send a message (JSON body).
    pub const MESSAGE_SEND: &str = "message/send";
    /// Send a message accompanied by a file (multipart body).
    pub const MESSAGE_SEND_WITH_FILE: &str = "message/send_with_file";
    /// List a conversation's messages.
    pub const MESSAGE_LIST: &str = "message/list";
    /// List messages awaiting an agent response.
    pub const MESSAGE_PENDING: &str = "message/pending";
    /// Retrieve a cached file by id (binary GET).
    pub const MESSAGE_FILE: &str = "message/file";
    /// List all tasks.
    pub const TASK_LIST: &str = "task/list";
    /// List recorded events.
    pub const EVENT_LIST: &str = "event/list";
    /// Register an agent by base URL.
    pub const AGENT_REGISTER: &str = "agent/register";
    /// List registered agents.
    pub const AGENT_LIST: &str = "agent/list";
    /// Update the routing credential.
    pub const CREDENTIAL_UPDATE: &str = "credential/update";
}

/// A request envelope: a method name plus its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest<P> {
    /// The method being invoked.
    pub method: String,
    /// Method parameters.
    pub params: P,
}

impl<P> ApiRequest<P> {
    /// Creates a request envelope.
    #[must_use]
    pub fn new(method: impl Into<String>, params: P) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

/// A response envelope: exactly one of `result` or `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// The successful result, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,

    /// The error, when the call failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl<T> ApiResponse<T> {
    /// Creates a success response.
    #[must_use]
    pub const fn ok(result: T) -> Self {
        Self {
            result: Some(result),
            error: None,
        }
    }

    /// Creates an error response.
    #[must_use]
    pub const fn err(error: ApiError) -> Self {
        Self {
            result: None,
            error: Some(error),
        }
    }

    /// Unwraps the envelope into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the carried [`ApiError`], or a synthesised one when the
    /// envelope carried neither field.
    pub fn into_result(self) -> Result<T, ApiError> {
        match (self.result, self.error) {
            (Some(result), _) => Ok(result),
            (None, Some(error)) => Err(error),
            (None, None) => Err(ApiError::new("empty response envelope")),
        }
    }
}

/// A backend-reported error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    /// Human-readable description of the failure.
    pub message: String,
}

impl ApiError {
    /// Creates an error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Identity of an accepted message, returned from the send operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageInfo {
    /// The (possibly freshly assigned) message id.
    pub message_id: MessageId,

    /// The conversation the message was filed under, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<ConversationId>,
}

/// A file accompanying a multipart send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUpload {
    /// Original filename.
    pub filename: String,
    /// MIME type of the payload.
    pub mime_type: String,
    /// Base64-encoded payload bytes.
    pub bytes: String,
}

impl FileUpload {
    /// Creates an upload descriptor.
    #[must_use]
    pub fn new(
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// A cached file payload on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePayload {
    /// MIME type of the payload.
    pub mime_type: String,
    /// Base64-encoded payload bytes.
    pub bytes: String,
}
