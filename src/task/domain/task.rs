//! Task aggregate root and its status, artifact, and metadata types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::{TaskId, TaskState};
use crate::conversation::domain::{ConversationId, Message, Part};

/// Current status of a task: its state plus an optional status message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    /// The lifecycle state.
    pub state: TaskState,

    /// A message accompanying the status report, if the remote sent one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

impl TaskStatus {
    /// Creates a status with no accompanying message.
    #[must_use]
    pub const fn new(state: TaskState) -> Self {
        Self {
            state,
            message: None,
        }
    }

    /// Attaches a status message.
    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.message = Some(message);
        self
    }
}

/// Metadata attached to a task or one of its artifacts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskMetadata {
    /// The conversation the task belongs to, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<ConversationId>,

    /// A file reference propagated with the originating request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_reference: Option<String>,

    /// Extension data for custom metadata fields.
    #[serde(flatten, skip_serializing_if = "HashMap::is_empty")]
    pub extensions: HashMap<String, Value>,
}

impl TaskMetadata {
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

    /// Sets the propagated file reference.
    #[must_use]
    pub fn with_file_reference(mut self, reference: impl Into<String>) -> Self {
        self.file_reference = Some(reference.into());
        self
    }
}

/// A named output bundle produced by a task, distinct from its status
/// message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// A display name for the artifact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The ordered content parts of the artifact.
    pub parts: Vec<Part>,

    /// Artifact metadata, if the remote attached any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TaskMetadata>,
}

impl Artifact {
    /// Creates an unnamed artifact from content parts.
    #[must_use]
    pub const fn new(parts: Vec<Part>) -> Self {
        Self {
            name: None,
            parts,
            metadata: None,
        }
    }

    /// Sets the artifact name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attaches artifact metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: TaskMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Task aggregate root.
///
/// Created on dispatch in the `Submitted` state, updated on every status
/// report, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    task_id: TaskId,
    session_id: Option<ConversationId>,
    status: TaskStatus,
    history: Vec<Message>,
    artifacts: Vec<Artifact>,
    metadata: TaskMetadata,
}

impl Task {
    /// Creates a freshly-submitted task for an outgoing request.
    #[must_use]
    pub fn submitted(
        task_id: TaskId,
        session_id: ConversationId,
        message: Message,
        metadata: TaskMetadata,
    ) -> Self {
        Self {
            task_id,
            session_id: Some(session_id),
            status: TaskStatus::new(TaskState::Submitted),
            history: vec![message],
            artifacts: Vec::new(),
            metadata,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the session (conversation) identifier, when set explicitly.
    #[must_use]
    pub const fn session_id(&self) -> Option<ConversationId> {
        self.session_id
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> &TaskStatus {
        &self.status
    }

    /// Returns the ordered message history.
    #[must_use]
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Returns the artifacts produced so far.
    #[must_use]
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Returns the task metadata.
    #[must_use]
    pub const fn metadata(&self) -> &TaskMetadata {
        &self.metadata
    }

    /// Returns `true` once the task has reached a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.state.is_terminal()
    }

    /// Replaces the status with a newer report.
    ///
    /// The latest received status is authoritative. A status message, when
    /// present, is also appended to the history.
    pub fn update_status(&mut self, status: TaskStatus) {
        if let Some(message) = &status.message {
            self.history.push(message.clone());
        }
        self.status = status;
    }

    /// Appends an artifact reported by the remote.
    pub fn add_artifact(&mut self, artifact: Artifact) {
        self.artifacts.push(artifact);
    }

    /// Resolves the conversation this task belongs to.
    ///
    /// Precedence is fixed: the explicit session id, then the status
    /// message's metadata, then the task metadata, then the first artifact
    /// carrying one. Returns `None` when no source names a conversation;
    /// such tasks are displayed ungrouped.
    #[must_use]
    pub fn conversation_id(&self) -> Option<ConversationId> {
        if let Some(session_id) = self.session_id {
            return Some(session_id);
        }
        if let Some(id) = self
            .status
            .message
            .as_ref()
            .and_then(Message::conversation_id)
        {
            return Some(id);
        }
        if let Some(id) = self.metadata.conversation_id {
            return Some(id);
        }
        self.artifacts
            .iter()
            .find_map(|artifact| artifact.metadata.as_ref()?.conversation_id)
    }
}
