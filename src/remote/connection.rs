//! One agent's connection: dispatching task requests and folding updates.

use std::sync::Arc;

use super::domain::{TaskSendRequest, TaskUpdate};
use super::ports::{TaskTransport, TransportResult};
use crate::registry::domain::AgentCard;
use crate::task::domain::Task;
use crate::task::ports::TaskObserver;

/// A client for one remote agent.
///
/// Cheap to construct: holds the agent's card and a shared transport. The
/// card's capability flags select the exchange shape: streaming when
/// advertised, one-shot otherwise.
#[derive(Debug, Clone)]
pub struct RemoteAgentConnection<T>
where
    T: TaskTransport,
{
    card: AgentCard,
    transport: Arc<T>,
}

impl<T> RemoteAgentConnection<T>
where
    T: TaskTransport,
{
    /// Creates a connection for the given card.
    #[must_use]
    pub const fn new(card: AgentCard, transport: Arc<T>) -> Self {
        Self { card, transport }
    }

    /// Returns the agent card this connection talks to.
    #[must_use]
    pub const fn card(&self) -> &AgentCard {
        &self.card
    }

    /// Sends a task request and returns the final task, if one was
    /// produced.
    ///
    /// The submitted task snapshot is reported to the observer before the
    /// exchange starts, and again after every folded update. A streaming
    /// session that closes without delivering a single update yields
    /// `Ok(None)`: the caller treats the exchange as completed.
    ///
    /// # Errors
    ///
    /// Returns [`super::ports::TransportError`] when the underlying call
    /// fails or its response is malformed.
    pub async fn send_task(
        &self,
        request: TaskSendRequest,
        observer: Option<&dyn TaskObserver>,
    ) -> TransportResult<Option<Task>> {
        let mut task = Task::submitted(
            request.task_id,
            request.session_id,
            request.message.clone(),
            request.metadata.clone(),
        );
        notify(observer, &task).await;

        if self.card.capabilities.streaming {
            self.stream_task(&request, task, observer).await
        } else {
            task = self.transport.send_task(&request).await?;
            notify(observer, &task).await;
            Ok(Some(task))
        }
    }

    async fn stream_task(
        &self,
        request: &TaskSendRequest,
        mut task: Task,
        observer: Option<&dyn TaskObserver>,
    ) -> TransportResult<Option<Task>> {
        let mut updates = self.transport.open_task_stream(request).await?;
        let mut received_any = false;

        while let Some(update) = updates.recv().await {
            received_any = true;
            let finished = matches!(update, TaskUpdate::Status { is_final: true, .. });
            match update {
                TaskUpdate::Status { status, .. } => task.update_status(status),
                TaskUpdate::Artifact { artifact } => task.add_artifact(artifact),
            }
            notify(observer, &task).await;
            if finished {
                break;
            }
        }

        if received_any {
            Ok(Some(task))
        } else {
            tracing::debug!(
                agent = %self.card.name,
                task_id = %request.task_id,
                "stream closed without updates; treating exchange as completed"
            );
            Ok(None)
        }
    }
}

async fn notify(observer: Option<&dyn TaskObserver>, task: &Task) {
    if let Some(observer) = observer {
        observer.on_task_update(task).await;
    }
}
