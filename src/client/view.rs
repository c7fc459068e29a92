//! The polling read model a client renders from.
//!
//! `refresh` pulls the authoritative state from the backend and folds it
//! into the view. Two rules govern the fold: read failures degrade to
//! empty results (absence means "temporarily unavailable"; the next poll
//! retries naturally), and the message list is merged through the
//! reconciler so locally-optimistic entries survive until the server
//! reflects them and never duplicate afterwards.

use std::collections::{HashMap, HashSet};

use super::ConversationClient;
use super::transport::ApiTransport;
use crate::conversation::domain::{Conversation, ConversationId, Message, MessageId};
use crate::reconcile::merge_histories;
use crate::task::domain::Task;

/// A task grouped under the conversation it belongs to.
///
/// Grouping uses the task's fixed conversation-id precedence; tasks naming
/// no conversation surface with `conversation_id` of `None`.
#[derive(Debug, Clone)]
pub struct SessionTask {
    /// The owning conversation, when resolvable.
    pub conversation_id: Option<ConversationId>,
    /// The task itself.
    pub task: Task,
}

/// Client-side state assembled from polling.
#[derive(Debug, Default)]
pub struct ClientView {
    current_conversation: Option<ConversationId>,
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
    tasks: Vec<SessionTask>,
    pending: HashMap<MessageId, String>,
}

impl ClientView {
    /// Creates an empty view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the conversation whose messages the view tracks.
    pub fn set_current_conversation(&mut self, conversation_id: ConversationId) {
        if self.current_conversation != Some(conversation_id) {
            self.current_conversation = Some(conversation_id);
            self.messages.clear();
        }
    }

    /// Returns the selected conversation.
    #[must_use]
    pub const fn current_conversation(&self) -> Option<ConversationId> {
        self.current_conversation
    }

    /// Returns the known conversations.
    #[must_use]
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Returns the merged message list for the selected conversation.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the grouped task list.
    #[must_use]
    pub fn tasks(&self) -> &[SessionTask] {
        &self.tasks
    }

    /// Returns the pending-message map.
    #[must_use]
    pub const fn pending(&self) -> &HashMap<MessageId, String> {
        &self.pending
    }

    /// Appends a locally-optimistic message before the server reflects it.
    ///
    /// Messages already present (by id) are ignored, so rapid re-sends do
    /// not duplicate entries.
    pub fn push_local_message(&mut self, message: Message) {
        let exists = message.message_id().is_some_and(|id| {
            self.messages
                .iter()
                .any(|existing| existing.message_id() == Some(id))
        });
        if !exists {
            self.messages.push(message);
        }
    }

    /// Pulls fresh state from the backend.
    ///
    /// Each read independently degrades failure to an empty result; a poll
    /// during a backend hiccup renders an empty-but-consistent view and the
    /// next poll recovers.
    pub async fn refresh<T>(&mut self, client: &ConversationClient<T>)
    where
        T: ApiTransport,
    {
        self.pending = or_empty(client.pending_messages().await, "pending messages")
            .into_iter()
            .map(|pending| (pending.message_id, pending.note))
            .collect();

        if let Some(conversation_id) = self.current_conversation {
            let server = or_empty(
                client.list_messages(conversation_id).await,
                "conversation messages",
            );
            let pending_ids: HashSet<MessageId> = self.pending.keys().copied().collect();
            self.messages = merge_histories(&server, &self.messages, &pending_ids);
        }

        self.conversations = or_empty(client.list_conversations().await, "conversations");

        self.tasks = or_empty(client.list_tasks().await, "tasks")
            .into_iter()
            .map(|task| SessionTask {
                conversation_id: task.conversation_id(),
                task,
            })
            .collect();
    }
}

/// Degrades a read failure to an empty result, logging the reason.
fn or_empty<T>(result: super::transport::ClientResult<Vec<T>>, what: &str) -> Vec<T> {
    match result {
        Ok(values) => values,
        Err(error) => {
            tracing::warn!(%error, what, "read degraded to empty result");
            Vec::new()
        }
    }
}
