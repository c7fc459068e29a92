//! Unit tests for [`RemoteAgentConnection`].

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rstest::rstest;

use crate::conversation::domain::{ConversationId, Message, Part, Role};
use crate::registry::domain::{AgentCapabilities, AgentCard, AgentName};
use crate::remote::adapters::ScriptedTransport;
use crate::remote::connection::RemoteAgentConnection;
use crate::remote::domain::{TaskSendRequest, TaskUpdate};
use crate::task::domain::{Artifact, Task, TaskId, TaskMetadata, TaskState, TaskStatus};
use crate::task::ports::TaskObserver;

/// Observer capturing every snapshot's state for assertions.
#[derive(Debug, Default)]
struct RecordingObserver {
    states: Mutex<Vec<TaskState>>,
}

impl RecordingObserver {
    fn states(&self) -> Vec<TaskState> {
        self.states.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TaskObserver for RecordingObserver {
    async fn on_task_update(&self, task: &Task) {
        if let Ok(mut states) = self.states.lock() {
            states.push(task.status().state);
        }
    }
}

fn card(streaming: bool) -> AgentCard {
    AgentCard::new(
        AgentName::new("echo").expect("valid name"),
        "echoes things",
        "http://echo.example",
    )
    .with_capabilities(AgentCapabilities::new(streaming, false))
}

fn request() -> TaskSendRequest {
    let conversation_id = ConversationId::new();
    let message =
        Message::new(Role::User, vec![Part::text("hello")]).expect("valid message");
    TaskSendRequest::new(
        TaskId::new(),
        conversation_id,
        message,
        TaskMetadata::for_conversation(conversation_id),
    )
}

fn status_update(state: TaskState, is_final: bool) -> TaskUpdate {
    TaskUpdate::Status {
        status: TaskStatus::new(state),
        is_final,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn synchronous_dispatch_returns_final_task() {
    let transport = Arc::new(ScriptedTransport::completing_with("done"));
    let connection = RemoteAgentConnection::new(card(false), Arc::clone(&transport));
    let observer = RecordingObserver::default();

    let task = connection
        .send_task(request(), Some(&observer))
        .await
        .expect("dispatch succeeds")
        .expect("task produced");

    assert_eq!(task.status().state, TaskState::Completed);
    // Submitted snapshot first, final snapshot after the exchange.
    assert_eq!(
        observer.states(),
        [TaskState::Submitted, TaskState::Completed]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn streaming_folds_updates_with_latest_status_winning() {
    let transport = Arc::new(ScriptedTransport::streaming(vec![
        status_update(TaskState::Working, false),
        TaskUpdate::Artifact {
            artifact: Artifact::new(vec![Part::text("result")]).with_name("out"),
        },
        status_update(TaskState::Completed, true),
    ]));
    let connection = RemoteAgentConnection::new(card(true), Arc::clone(&transport));
    let observer = RecordingObserver::default();

    let task = connection
        .send_task(request(), Some(&observer))
        .await
        .expect("dispatch succeeds")
        .expect("task produced");

    assert_eq!(task.status().state, TaskState::Completed);
    assert_eq!(task.artifacts().len(), 1);
    assert_eq!(
        observer.states(),
        [
            TaskState::Submitted,
            TaskState::Working,
            TaskState::Working,
            TaskState::Completed,
        ]
    );
}

/// A stream that closes without updates is an accepted outcome, not a
/// fault.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_stream_yields_no_final_task() {
    let transport = Arc::new(ScriptedTransport::streaming(Vec::new()));
    let connection = RemoteAgentConnection::new(card(true), transport);

    let result = connection
        .send_task(request(), None)
        .await
        .expect("dispatch succeeds");

    assert!(result.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn final_flag_ends_the_stream_early() {
    let transport = Arc::new(ScriptedTransport::streaming(vec![
        status_update(TaskState::Completed, true),
        // Anything after the final update must be ignored.
        status_update(TaskState::Failed, false),
    ]));
    let connection = RemoteAgentConnection::new(card(true), transport);

    let task = connection
        .send_task(request(), None)
        .await
        .expect("dispatch succeeds")
        .expect("task produced");

    assert_eq!(task.status().state, TaskState::Completed);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transport_failure_propagates() {
    let transport = Arc::new(ScriptedTransport::failing_with("connection reset"));
    let connection = RemoteAgentConnection::new(card(false), transport);

    let result = connection.send_task(request(), None).await;
    assert!(result.is_err());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn request_metadata_reaches_the_transport() {
    let transport = Arc::new(ScriptedTransport::completing_with("done"));
    let connection = RemoteAgentConnection::new(card(false), Arc::clone(&transport));

    let sent = request();
    let conversation_id = sent.session_id;
    connection
        .send_task(sent, None)
        .await
        .expect("dispatch succeeds");

    let recorded = transport.recorded_requests();
    assert_eq!(recorded.len(), 1);
    assert_eq!(
        recorded[0].metadata.conversation_id,
        Some(conversation_id)
    );
}
