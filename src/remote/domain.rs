//! Wire-level types exchanged with remote agents.

use serde::{Deserialize, Serialize};

use crate::conversation::domain::{ConversationId, Message};
use crate::task::domain::{Artifact, TaskId, TaskMetadata, TaskStatus};

/// Output modes the host accepts from any agent.
pub const DEFAULT_ACCEPTED_OUTPUT_MODES: &[&str] =
    &["text", "text/plain", "image/png", "application/pdf"];

/// An outgoing task request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSendRequest {
    /// The task this request belongs to. Reused across turns while a task
    /// is awaiting input.
    pub task_id: TaskId,

    /// The session (conversation) the task runs in.
    pub session_id: ConversationId,

    /// The user message being delegated.
    pub message: Message,

    /// MIME types the host accepts in responses.
    pub accepted_output_modes: Vec<String>,

    /// Task metadata propagated to the remote: conversation id and any
    /// file reference from the originating message.
    pub metadata: TaskMetadata,
}

impl TaskSendRequest {
    /// Creates a request with the default accepted output modes.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        session_id: ConversationId,
        message: Message,
        metadata: TaskMetadata,
    ) -> Self {
        Self {
            task_id,
            session_id,
            message,
            accepted_output_modes: DEFAULT_ACCEPTED_OUTPUT_MODES
                .iter()
                .map(|mode| (*mode).to_owned())
                .collect(),
            metadata,
        }
    }
}

/// One update delivered on a streaming task exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskUpdate {
    /// A status report. The latest one received is authoritative.
    Status {
        /// The reported status.
        status: TaskStatus,
        /// Marks the final update of the exchange.
        #[serde(default)]
        is_final: bool,
    },
    /// An artifact produced by the task.
    Artifact {
        /// The reported artifact.
        artifact: Artifact,
    },
}
