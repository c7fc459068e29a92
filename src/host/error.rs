//! Dispatch error taxonomy for the host orchestrator.

use thiserror::Error;

use crate::conversation::domain::MessageBuilderError;
use crate::conversation::error::{CacheError, StoreError};
use crate::registry::domain::AgentName;
use crate::registry::services::RegistryError;
use crate::remote::ports::TransportError;
use crate::task::domain::TaskId;

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors raised while dispatching a message to a remote agent.
///
/// Terminal task failures are raised, never absorbed: a silently-dropped
/// failure would strand a conversation with no visible explanation.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The routing target is not registered.
    #[error("agent not found: {0}")]
    AgentNotFound(String),

    /// No agents are registered, so no routing decision is possible.
    #[error("no agents registered")]
    NoAgentsRegistered,

    /// The message metadata names no conversation.
    #[error("message has no conversation id")]
    MissingConversation,

    /// The remote canceled the task.
    #[error("agent {agent} task {task_id} was canceled")]
    TaskCanceled {
        /// The agent that reported the cancellation.
        agent: AgentName,
        /// The canceled task.
        task_id: TaskId,
    },

    /// The remote reported the task as failed.
    #[error("agent {agent} task {task_id} failed")]
    TaskFailed {
        /// The agent that reported the failure.
        agent: AgentName,
        /// The failed task.
        task_id: TaskId,
    },

    /// The call to the remote agent failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Registry lookup failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The conversation store rejected an operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The file cache rejected a payload.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Reply assembly produced no valid message.
    #[error(transparent)]
    Reply(#[from] MessageBuilderError),

    /// Internal state was unavailable (poisoned lock).
    #[error("orchestrator state unavailable: {0}")]
    Internal(String),
}
