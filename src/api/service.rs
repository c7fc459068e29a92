//! The backend service facade behind the request envelope.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use mockable::Clock;
use thiserror::Error;

use super::envelope::{FilePayload, FileUpload, MessageInfo};
use crate::conversation::cache::CacheId;
use crate::conversation::domain::{
    Conversation, ConversationId, Event, FileContent, Message, MessageBuilderError, Part,
};
use crate::conversation::error::{CacheError, StoreError};
use crate::conversation::store::{ConversationStore, PendingMessage};
use crate::host::orchestrator::{HostContext, HostOrchestrator};
use crate::host::router::AgentRouter;
use crate::registry::domain::AgentCard;
use crate::registry::ports::CardResolver;
use crate::registry::services::{AgentRegistry, BatchRegistration, RegistryError};
use crate::remote::ports::TaskTransport;
use crate::task::domain::Task;
use crate::task::store::{TaskStore, TaskStoreError};
use crate::worker;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced at the service facade.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The conversation store rejected the operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The file cache rejected the operation.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The task store rejected the operation.
    #[error(transparent)]
    Tasks(#[from] TaskStoreError),

    /// The agent registry rejected the operation.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The orchestrator rejected the operation.
    #[error(transparent)]
    Dispatch(#[from] crate::host::error::DispatchError),

    /// The message payload was structurally invalid.
    #[error(transparent)]
    InvalidMessage(#[from] MessageBuilderError),
}

/// The backend: one object wiring the store, registry, orchestrator, and
/// workers behind the client-facing operations.
#[derive(Debug)]
pub struct ConversationService<D, T, R, C>
where
    D: CardResolver + Send + Sync + 'static,
    T: TaskTransport + 'static,
    R: AgentRouter + 'static,
    C: Clock + Send + Sync + 'static,
{
    orchestrator: Arc<HostOrchestrator<D, T, R, C>>,
    registry: Arc<AgentRegistry<D>>,
    store: Arc<ConversationStore>,
    tasks: Arc<TaskStore>,
    clock: Arc<C>,
}

impl<D, T, R, C> ConversationService<D, T, R, C>
where
    D: CardResolver + Send + Sync + 'static,
    T: TaskTransport + 'static,
    R: AgentRouter + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Builds the service and its orchestrator from one context.
    #[must_use]
    pub fn new(context: HostContext<D, T, R, C>) -> Self {
        let registry = Arc::clone(&context.registry);
        let store = Arc::clone(&context.store);
        let tasks = Arc::clone(&context.tasks);
        let clock = Arc::clone(&context.clock);
        Self {
            orchestrator: Arc::new(HostOrchestrator::new(context)),
            registry,
            store,
            tasks,
            clock,
        }
    }

    /// Returns the orchestrator backing this service.
    #[must_use]
    pub const fn orchestrator(&self) -> &Arc<HostOrchestrator<D, T, R, C>> {
        &self.orchestrator
    }

    /// Creates a new conversation.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when the store is unavailable.
    pub fn create_conversation(&self) -> ServiceResult<Conversation> {
        Ok(self.store.create_conversation(&*self.clock)?)
    }

    /// Lists all conversations in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when the store is unavailable.
    pub fn list_conversations(&self) -> ServiceResult<Vec<Conversation>> {
        Ok(self.store.list_conversations()?)
    }

    /// Accepts an inbound message: sanitise, persist, mark pending, and
    /// spawn the supervised dispatch worker.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] wrapping
    /// [`StoreError::ConversationNotFound`] when the metadata names a
    /// conversation that does not exist, or when persistence fails.
    /// Dispatch failures surface later as agent-role error entries, not
    /// here.
    pub fn send_message(&self, message: Message) -> ServiceResult<MessageInfo> {
        let sanitized = ConversationStore::sanitize(message);
        if let Some(conversation_id) = sanitized.conversation_id()
            && self.store.conversation(conversation_id)?.is_none()
        {
            return Err(StoreError::ConversationNotFound(conversation_id).into());
        }
        self.store.append_message(&sanitized)?;
        self.store.record_event(Event::new(
            sanitized.role().as_str(),
            sanitized.clone(),
            &*self.clock,
        ))?;

        let message_id = sanitized
            .message_id()
            .ok_or(StoreError::UnsanitizedMessage)?;
        self.store.mark_pending(message_id, "")?;

        worker::spawn_dispatch(
            Arc::clone(&self.orchestrator),
            Arc::clone(&self.store),
            Arc::clone(&self.clock),
            sanitized.clone(),
        );

        Ok(MessageInfo {
            message_id,
            conversation_id: sanitized.conversation_id(),
        })
    }

    /// Accepts an inbound message with an accompanying file.
    ///
    /// The upload is attached as an inline file part and its name recorded
    /// as the message's file reference; extraction of text from the file
    /// is the embedding shell's concern, not the backend's.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidMessage`] when the rebuilt message is
    /// structurally invalid, otherwise as [`Self::send_message`].
    pub fn send_message_with_file(
        &self,
        message: Message,
        upload: FileUpload,
    ) -> ServiceResult<MessageInfo> {
        let file = FileContent::from_bytes(upload.mime_type.clone(), upload.bytes.clone())
            .with_name(upload.filename.clone());

        let metadata = message
            .metadata()
            .clone()
            .with_file_reference(upload.filename);

        let with_file = Message::builder(message.role())
            .with_parts(message.parts().to_vec())
            .with_part(Part::file(file))
            .with_metadata(metadata)
            .build()?;

        self.send_message(with_file)
    }

    /// Returns a conversation's messages with inline file payloads
    /// rewritten into cache references.
    ///
    /// An unknown conversation yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] or [`ServiceError::Cache`] when the
    /// store or cache is unavailable.
    pub fn list_messages(&self, conversation_id: ConversationId) -> ServiceResult<Vec<Message>> {
        let messages = self.store.messages_for(conversation_id)?;
        Ok(self.store.cache().cache_parts(messages)?)
    }

    /// Returns the messages still awaiting an agent response.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when the store is unavailable.
    pub fn pending_messages(&self) -> ServiceResult<Vec<PendingMessage>> {
        Ok(self.store.pending_messages()?)
    }

    /// Returns all tasks in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Tasks`] when the task store is unavailable.
    pub fn list_tasks(&self) -> ServiceResult<Vec<Task>> {
        Ok(self.tasks.list()?)
    }

    /// Returns all recorded events.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when the store is unavailable.
    pub fn list_events(&self) -> ServiceResult<Vec<Event>> {
        Ok(self.store.events()?)
    }

    /// Registers the agent served at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Registry`] when the peer is unreachable or
    /// serves a malformed card.
    pub async fn register_agent(&self, base_url: &str) -> ServiceResult<AgentCard> {
        Ok(self.registry.register(base_url).await?)
    }

    /// Registers every reachable agent in the batch, skipping the rest.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Registry`] only on internal failure;
    /// unreachable peers are reported in the outcome, never raised.
    pub async fn register_agents<I, S>(&self, base_urls: I) -> ServiceResult<BatchRegistration>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.registry.register_all(base_urls).await?)
    }

    /// Returns all registered agent cards.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Registry`] when the registry is unavailable.
    pub fn list_agents(&self) -> ServiceResult<Vec<AgentCard>> {
        Ok(self.registry.list()?)
    }

    /// Retrieves a cached file by id.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Cache`] wrapping
    /// [`CacheError::NotFound`] for an unknown id.
    pub fn get_file(&self, id: CacheId) -> ServiceResult<FilePayload> {
        let file = self.store.cache().get(id)?;
        Ok(FilePayload {
            mime_type: file.mime_type().to_owned(),
            bytes: BASE64.encode(file.bytes()),
        })
    }

    /// Updates the credential used by the routing capability.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Dispatch`] when orchestrator state is
    /// unavailable.
    pub fn update_credential(&self, credential: impl Into<String>) -> ServiceResult<()> {
        Ok(self.orchestrator.update_credential(credential)?)
    }
}
