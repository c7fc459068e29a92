//! Transport port for the client side of the envelope.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use serde_json::Value;

use crate::api::envelope::{ApiRequest, ApiResponse};

/// Result type for client calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Carries one envelope exchange to the backend.
///
/// Implementations own the wire: an HTTP POST per method in production, a
/// direct call into the service facade in tests. Backend-reported failures
/// travel inside the response envelope; transport-level failures are
/// returned as errors here.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Carries one request envelope and returns the response envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] for error statuses,
    /// [`ClientError::Transport`] for failed calls, and
    /// [`ClientError::Decode`] for response bodies that do not parse as an
    /// envelope.
    async fn call(&self, request: ApiRequest<Value>) -> ClientResult<ApiResponse<Value>>;
}

/// Errors surfaced by the client.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The backend answered with an error status.
    #[error("backend returned status {status}: {message}")]
    Http {
        /// The HTTP status code.
        status: u16,
        /// The response body or reason phrase.
        message: String,
    },

    /// The call failed before an answer arrived.
    #[error("transport failure: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The response body did not decode.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The response envelope carried an error.
    #[error("backend error: {0}")]
    Backend(String),
}

impl ClientError {
    /// Wraps a transport-layer failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Creates an HTTP status error.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }
}
