//! Supervised dispatch workers.
//!
//! Each inbound message gets its own worker running the full
//! route → dispatch → append pipeline. Workers are supervised: the inner
//! task's outcome, including a panic, is observed by a supervisor that
//! turns any failure into an agent-role error entry attached to the
//! originating message's conversation. Nothing fails unobserved, and the
//! pending marker is cleared on every exit path.
//!
//! Workers for different messages run concurrently, even within one
//! conversation; each worker's own appends are in submission order, while
//! cross-worker order is completion order. The store tolerates this by
//! construction.

use std::sync::Arc;

use mockable::Clock;
use tokio::task::JoinHandle;

use crate::conversation::domain::{Event, Message, MessageId, MessageMetadata, Part, Role};
use crate::conversation::store::ConversationStore;
use crate::host::orchestrator::HostOrchestrator;
use crate::host::router::AgentRouter;
use crate::registry::ports::CardResolver;
use crate::remote::ports::TaskTransport;
use serde_json::json;

/// Handle to a spawned worker's supervisor.
///
/// Dropping the handle detaches the worker; awaiting it blocks until the
/// pipeline and its failure handling have fully finished. The client-facing
/// send path drops it (the read path is pull-based polling), while tests
/// await it for determinism.
#[derive(Debug)]
pub struct WorkerHandle {
    supervisor: JoinHandle<()>,
}

impl WorkerHandle {
    /// Waits for the worker, including its failure handling, to finish.
    pub async fn wait(self) {
        if let Err(error) = self.supervisor.await {
            tracing::error!(%error, "worker supervisor crashed");
        }
    }
}

/// Spawns a supervised worker processing one sanitised inbound message.
pub fn spawn_dispatch<D, T, R, C>(
    orchestrator: Arc<HostOrchestrator<D, T, R, C>>,
    store: Arc<ConversationStore>,
    clock: Arc<C>,
    message: Message,
) -> WorkerHandle
where
    D: CardResolver + Send + Sync + 'static,
    T: TaskTransport + 'static,
    R: AgentRouter + 'static,
    C: Clock + Send + Sync + 'static,
{
    let message_id = message.message_id();
    let conversation_id = message.conversation_id();

    let pipeline = {
        let message = message.clone();
        tokio::spawn(async move { orchestrator.process_message(message).await })
    };

    let supervisor = tokio::spawn(async move {
        let failure = match pipeline.await {
            Ok(Ok(_reply)) => None,
            Ok(Err(error)) => Some(error.to_string()),
            Err(join_error) => Some(format!("worker crashed: {join_error}")),
        };

        if let Some(reason) = failure {
            tracing::error!(
                message_id = ?message_id,
                conversation_id = ?conversation_id,
                %reason,
                "dispatch failed"
            );
            record_failure(&store, &*clock, &message, &reason);
        }

        if let Some(id) = message_id
            && let Err(error) = store.clear_pending(id)
        {
            tracing::warn!(message_id = %id, %error, "failed to clear pending marker");
        }
    });

    WorkerHandle { supervisor }
}

/// Appends an agent-role error entry naming the failed message, so the
/// conversation shows why no response arrived.
fn record_failure(store: &ConversationStore, clock: &impl Clock, message: &Message, reason: &str) {
    let mut metadata = MessageMetadata::empty().with_message_id(MessageId::new());
    metadata.conversation_id = message.conversation_id();
    if let Some(failed_id) = message.message_id() {
        metadata = metadata.with_extension("failed_message_id", json!(failed_id.to_string()));
    }

    let entry = Message::builder(Role::Agent)
        .with_part(Part::text(format!("Error processing request: {reason}")))
        .with_metadata(metadata)
        .build();

    match entry {
        Ok(entry) => {
            if let Err(error) = store.append_message(&entry) {
                tracing::error!(%error, "failed to append error entry");
                return;
            }
            if let Err(error) = store.record_event(Event::new("host", entry, clock)) {
                tracing::warn!(%error, "failed to record error event");
            }
        }
        Err(error) => tracing::error!(%error, "failed to build error entry"),
    }
}
