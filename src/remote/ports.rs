//! Transport port for task exchanges with remote agents.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

use super::domain::{TaskSendRequest, TaskUpdate};
use crate::task::domain::Task;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Issues task requests to a remote agent.
///
/// Implementations own the wire protocol; the connection only decides
/// between the one-shot and streaming shapes based on the agent's card.
#[async_trait]
pub trait TaskTransport: Send + Sync {
    /// Sends a task request and waits for the final task object.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Transport`] when the call fails and
    /// [`TransportError::Decode`] when the response body is malformed.
    async fn send_task(&self, request: &TaskSendRequest) -> TransportResult<Task>;

    /// Opens a streaming task exchange.
    ///
    /// The returned channel yields updates until the remote closes the
    /// stream. Closing without any update is an accepted outcome the
    /// caller must tolerate.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Transport`] when the stream cannot be
    /// opened and [`TransportError::Decode`] when the handshake response is
    /// malformed.
    async fn open_task_stream(
        &self,
        request: &TaskSendRequest,
    ) -> TransportResult<mpsc::Receiver<TaskUpdate>>;
}

/// Errors returned by task transport implementations.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The call to the remote agent failed.
    #[error("transport failure: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The response body did not decode.
    #[error("malformed response body: {0}")]
    Decode(String),
}

impl TransportError {
    /// Wraps a transport-layer failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode(reason.into())
    }
}
