//! In-memory task transport for tests.

use async_trait::async_trait;
use std::sync::RwLock;
use tokio::sync::mpsc;

use crate::conversation::domain::{Message, Part, Role};
use crate::remote::domain::{TaskSendRequest, TaskUpdate};
use crate::remote::ports::{TaskTransport, TransportError, TransportResult};
use crate::task::domain::{Artifact, Task, TaskState, TaskStatus};

/// Thread-safe scripted task transport.
///
/// One-shot requests are answered with a task in the configured state,
/// optionally carrying a status message and artifacts; streaming requests
/// replay the scripted update sequence and close. Every request is
/// recorded for inspection. Suitable for unit tests only.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    reply_state: Option<TaskState>,
    reply_text: Option<String>,
    artifacts: Vec<Artifact>,
    updates: Vec<TaskUpdate>,
    fail_with: Option<String>,
    requests: RwLock<Vec<TaskSendRequest>>,
}

impl ScriptedTransport {
    /// Creates a transport that completes every task with the given text.
    #[must_use]
    pub fn completing_with(text: impl Into<String>) -> Self {
        Self {
            reply_state: Some(TaskState::Completed),
            reply_text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Creates a transport replying in the given state with no text.
    #[must_use]
    pub fn replying_in_state(state: TaskState) -> Self {
        Self {
            reply_state: Some(state),
            ..Self::default()
        }
    }

    /// Creates a streaming transport that replays the given updates.
    ///
    /// An empty script closes the stream without any update.
    #[must_use]
    pub fn streaming(updates: Vec<TaskUpdate>) -> Self {
        Self {
            updates,
            ..Self::default()
        }
    }

    /// Creates a transport whose calls all fail.
    #[must_use]
    pub fn failing_with(reason: impl Into<String>) -> Self {
        Self {
            fail_with: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Attaches a status-message text to the scripted reply.
    #[must_use]
    pub fn with_reply_text(mut self, text: impl Into<String>) -> Self {
        self.reply_text = Some(text.into());
        self
    }

    /// Adds an artifact to the scripted reply.
    #[must_use]
    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifacts.push(artifact);
        self
    }

    /// Returns every request recorded so far.
    #[must_use]
    pub fn recorded_requests(&self) -> Vec<TaskSendRequest> {
        self.requests
            .read()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn record(&self, request: &TaskSendRequest) {
        if let Ok(mut requests) = self.requests.write() {
            requests.push(request.clone());
        }
    }

    fn scripted_reply(&self, request: &TaskSendRequest) -> Task {
        let mut task = Task::submitted(
            request.task_id,
            request.session_id,
            request.message.clone(),
            request.metadata.clone(),
        );
        let state = self.reply_state.unwrap_or(TaskState::Completed);
        let mut status = TaskStatus::new(state);
        if let Some(text) = &self.reply_text
            && let Ok(message) = Message::new(Role::Agent, vec![Part::text(text.clone())])
        {
            status = status.with_message(message);
        }
        task.update_status(status);
        for artifact in &self.artifacts {
            task.add_artifact(artifact.clone());
        }
        task
    }
}

#[async_trait]
impl TaskTransport for ScriptedTransport {
    async fn send_task(&self, request: &TaskSendRequest) -> TransportResult<Task> {
        self.record(request);
        if let Some(reason) = &self.fail_with {
            return Err(TransportError::transport(std::io::Error::other(
                reason.clone(),
            )));
        }
        Ok(self.scripted_reply(request))
    }

    async fn open_task_stream(
        &self,
        request: &TaskSendRequest,
    ) -> TransportResult<mpsc::Receiver<TaskUpdate>> {
        self.record(request);
        if let Some(reason) = &self.fail_with {
            return Err(TransportError::transport(std::io::Error::other(
                reason.clone(),
            )));
        }

        let capacity = self.updates.len().max(1);
        let (sender, receiver) = mpsc::channel(capacity);
        for update in &self.updates {
            // Capacity covers the whole script, so try_send cannot fail.
            if sender.try_send(update.clone()).is_err() {
                break;
            }
        }
        drop(sender);
        Ok(receiver)
    }
}
