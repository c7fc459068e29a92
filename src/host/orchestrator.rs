//! The host orchestrator: the dispatch pipeline's context and brain.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use mockable::Clock;
use serde_json::json;

use super::error::{DispatchError, DispatchResult};
use super::router::{AgentRouter, RoutingRequest};
use super::session::SessionState;
use crate::conversation::cache::FileCache;
use crate::conversation::domain::{
    ConversationId, Event, Message, MessageId, MessageMetadata, Part, Role,
};
use crate::conversation::store::ConversationStore;
use crate::registry::domain::{AgentCard, AgentName};
use crate::registry::ports::CardResolver;
use crate::registry::services::AgentRegistry;
use crate::remote::connection::RemoteAgentConnection;
use crate::remote::domain::TaskSendRequest;
use crate::remote::ports::TaskTransport;
use crate::task::domain::{Task, TaskId, TaskMetadata, TaskState};
use crate::task::ports::TaskObserver;
use crate::task::store::TaskStore;

/// Upper bound on the routing decision call. Task execution itself is
/// never bounded here: once dispatched, a call runs to completion or
/// failure.
const ROUTING_TIMEOUT: Duration = Duration::from_secs(20);

/// The resources the orchestrator owns: every collaborator the dispatch
/// pipeline touches, passed in explicitly at construction.
#[derive(Debug)]
pub struct HostContext<D, T, R, C>
where
    D: CardResolver,
    T: TaskTransport,
    R: AgentRouter,
    C: Clock + Send + Sync,
{
    /// The agent registry.
    pub registry: Arc<AgentRegistry<D>>,
    /// The task transport shared by all connections.
    pub transport: Arc<T>,
    /// The external routing capability.
    pub router: Arc<R>,
    /// The conversation store (and its file cache).
    pub store: Arc<ConversationStore>,
    /// The task store, observing every dispatch.
    pub tasks: Arc<TaskStore>,
    /// Clock for event timestamps.
    pub clock: Arc<C>,
}

/// Result of dispatching one message to a remote agent.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    /// The assembled agent-role reply.
    pub reply: Message,
    /// The final task object, when the exchange produced one.
    pub task: Option<Task>,
    /// `true` when the turn requires user input before any automated
    /// follow-up.
    pub awaiting_input: bool,
}

/// Routes messages to remote agents and interprets what comes back.
#[derive(Debug)]
pub struct HostOrchestrator<D, T, R, C>
where
    D: CardResolver,
    T: TaskTransport,
    R: AgentRouter,
    C: Clock + Send + Sync,
{
    registry: Arc<AgentRegistry<D>>,
    transport: Arc<T>,
    router: Arc<R>,
    store: Arc<ConversationStore>,
    tasks: Arc<TaskStore>,
    clock: Arc<C>,
    sessions: RwLock<HashMap<ConversationId, SessionState>>,
    credential: RwLock<Option<String>>,
}

impl<D, T, R, C> HostOrchestrator<D, T, R, C>
where
    D: CardResolver,
    T: TaskTransport,
    R: AgentRouter,
    C: Clock + Send + Sync,
{
    /// Creates an orchestrator over the given context.
    #[must_use]
    pub fn new(context: HostContext<D, T, R, C>) -> Self {
        Self {
            registry: context.registry,
            transport: context.transport,
            router: context.router,
            store: context.store,
            tasks: context.tasks,
            clock: context.clock,
            sessions: RwLock::new(HashMap::new()),
            credential: RwLock::new(None),
        }
    }

    /// Returns the current session state for a conversation.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Internal`] on a poisoned lock.
    pub fn session(&self, conversation_id: ConversationId) -> DispatchResult<Option<SessionState>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|e| DispatchError::Internal(e.to_string()))?;
        Ok(sessions.get(&conversation_id).cloned())
    }

    /// Replaces the credential handed to subsequent routing decisions.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Internal`] on a poisoned lock.
    pub fn update_credential(&self, credential: impl Into<String>) -> DispatchResult<()> {
        let mut slot = self
            .credential
            .write()
            .map_err(|e| DispatchError::Internal(e.to_string()))?;
        *slot = Some(credential.into());
        Ok(())
    }

    /// Runs the full pipeline step for one sanitised inbound message:
    /// route, dispatch, persist the reply, record the event.
    ///
    /// # Errors
    ///
    /// Propagates routing and dispatch errors; the worker layer turns them
    /// into agent-role error entries.
    pub async fn process_message(&self, message: Message) -> DispatchResult<Message> {
        let agent = self.route(&message).await?;
        let outcome = self.dispatch(&agent, message).await?;
        self.store.append_message(&outcome.reply)?;
        self.store.record_event(Event::new(
            agent.as_str(),
            outcome.reply.clone(),
            &*self.clock,
        ))?;
        Ok(outcome.reply)
    }

    /// Resolves the agent for a message, pinning it to the session.
    ///
    /// An explicit `remote_agent` metadata override wins and must name a
    /// registered agent. Otherwise the pinned agent is reused; a session
    /// with no pin asks the external routing capability once (bounded to
    /// twenty seconds) and falls back to the earliest-registered agent if
    /// the capability fails, times out, abstains, or picks an unknown
    /// agent.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MissingConversation`] when the metadata
    /// names no conversation, [`DispatchError::AgentNotFound`] for an
    /// override naming an unregistered agent, and
    /// [`DispatchError::NoAgentsRegistered`] when the registry is empty.
    pub async fn route(&self, message: &Message) -> DispatchResult<AgentName> {
        let conversation_id = message
            .conversation_id()
            .ok_or(DispatchError::MissingConversation)?;

        if let Some(choice) = &message.metadata().remote_agent {
            let name = self
                .match_choice(choice)?
                .ok_or_else(|| DispatchError::AgentNotFound(choice.clone()))?;
            self.pin_agent(conversation_id, &name)?;
            return Ok(name);
        }

        if let Some(session) = self.session(conversation_id)?
            && let Some(pinned) = session.pinned_agent
        {
            return Ok(pinned);
        }

        let name = self.pick_via_router(message).await?;
        self.pin_agent(conversation_id, &name)?;
        Ok(name)
    }

    /// Dispatches a message to the named agent and interprets the result.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::AgentNotFound`] when the name is not
    /// registered, [`DispatchError::TaskCanceled`] /
    /// [`DispatchError::TaskFailed`] for terminal unsuccessful states, and
    /// transport errors for failed calls. Terminal failures are raised,
    /// never absorbed.
    pub async fn dispatch(
        &self,
        agent_name: &AgentName,
        message: Message,
    ) -> DispatchResult<DispatchOutcome> {
        let card = self
            .registry
            .get(agent_name)?
            .ok_or_else(|| DispatchError::AgentNotFound(agent_name.to_string()))?;
        let conversation_id = message
            .conversation_id()
            .ok_or(DispatchError::MissingConversation)?;

        let session = self.session(conversation_id)?.unwrap_or_default();
        let task_id = session.active_task().unwrap_or_default();
        let request = build_request(task_id, conversation_id, message);

        let connection = RemoteAgentConnection::new(card.clone(), Arc::clone(&self.transport));
        let observer = self.tasks.as_ref() as &dyn TaskObserver;
        let result = connection.send_task(request, Some(observer)).await?;

        self.interpret(&card, conversation_id, session, result)
    }

    fn interpret(
        &self,
        card: &AgentCard,
        conversation_id: ConversationId,
        session: SessionState,
        result: Option<Task>,
    ) -> DispatchResult<DispatchOutcome> {
        let agent = card.name.clone();
        let reply_id = MessageId::new();
        let mut next = session;

        let (parts, awaiting_input, task) = match result {
            None => {
                next.session_active = false;
                next.task_id = None;
                next.awaiting_input = false;
                let text = format!("Task completed with no final status from {agent}");
                (vec![Part::text(text)], false, None)
            }
            Some(task) => {
                let state = task.status().state;
                next.session_active = !state.is_terminal();
                next.task_id = next.session_active.then(|| task.task_id());
                match state {
                    TaskState::Canceled => {
                        next.awaiting_input = false;
                        self.store_session(conversation_id, next)?;
                        return Err(DispatchError::TaskCanceled {
                            agent,
                            task_id: task.task_id(),
                        });
                    }
                    TaskState::Failed => {
                        next.awaiting_input = false;
                        self.store_session(conversation_id, next)?;
                        return Err(DispatchError::TaskFailed {
                            agent,
                            task_id: task.task_id(),
                        });
                    }
                    _ => {}
                }

                let (mut parts, escalated) = self.assemble_parts(&task, reply_id)?;
                if parts.is_empty() {
                    parts.push(Part::text(format!("Task completed with no content from {agent}")));
                }
                next.awaiting_input = state == TaskState::InputRequired || escalated;
                (parts, next.awaiting_input, Some(task))
            }
        };

        let reply = Message::builder(Role::Agent)
            .with_parts(parts)
            .with_metadata(
                MessageMetadata::for_conversation(conversation_id).with_message_id(reply_id),
            )
            .build()?;

        self.store_session(conversation_id, next)?;
        Ok(DispatchOutcome {
            reply,
            task,
            awaiting_input,
        })
    }

    /// Concatenates response content: the status message's parts, then
    /// every artifact's parts, in order. Text and data pass through; a
    /// file part is cached under the reply message identity and replaced
    /// with a data reference, escalating the turn to caller-level handling
    /// (binary payloads are never summarised automatically).
    fn assemble_parts(
        &self,
        task: &Task,
        reply_id: MessageId,
    ) -> DispatchResult<(Vec<Part>, bool)> {
        let mut source: Vec<&Part> = Vec::new();
        if let Some(message) = &task.status().message {
            source.extend(message.parts());
        }
        for artifact in task.artifacts() {
            source.extend(&artifact.parts);
        }

        let mut parts = Vec::with_capacity(source.len());
        let mut escalated = false;
        for part in source {
            match part {
                Part::Text(_) | Part::Data(_) => parts.push(part.clone()),
                Part::File(file_part) => {
                    let index = parts.len();
                    let uri = if file_part.file.is_inline() {
                        let cache_id =
                            self.store
                                .cache()
                                .insert_part(reply_id, index, &file_part.file)?;
                        FileCache::uri_for(cache_id)
                    } else {
                        file_part.file.uri.clone().unwrap_or_default()
                    };
                    parts.push(Part::data(json!({
                        "file_uri": uri,
                        "mime_type": file_part.file.mime_type,
                    })));
                    escalated = true;
                }
            }
        }
        Ok((parts, escalated))
    }

    async fn pick_via_router(&self, message: &Message) -> DispatchResult<AgentName> {
        let summaries = self.registry.summaries()?;
        if summaries.is_empty() {
            return Err(DispatchError::NoAgentsRegistered);
        }

        let credential = self.credential_snapshot()?;
        let user_message = message.text_content();
        let request =
            RoutingRequest::new(&user_message, &summaries).with_credential(credential.as_deref());

        let decision =
            match tokio::time::timeout(ROUTING_TIMEOUT, self.router.pick_agent(request)).await {
                Ok(Ok(choice)) => choice,
                Ok(Err(error)) => {
                    tracing::warn!(%error, "routing capability failed; falling back");
                    None
                }
                Err(_elapsed) => {
                    tracing::warn!("routing decision timed out; falling back");
                    None
                }
            };

        if let Some(choice) = decision {
            if let Some(name) = self.match_choice(&choice)? {
                return Ok(name);
            }
            tracing::warn!(%choice, "router picked an unknown agent; falling back");
        }

        self.registry
            .first()?
            .map(|card| card.name)
            .ok_or(DispatchError::NoAgentsRegistered)
    }

    /// Matches a routing decision (an agent name or base URL) against
    /// the registered cards.
    fn match_choice(&self, choice: &str) -> DispatchResult<Option<AgentName>> {
        let trimmed = choice.trim();
        let wanted_url = trimmed.trim_end_matches('/');
        for card in self.registry.list()? {
            if card.name.as_str().eq_ignore_ascii_case(trimmed)
                || card.url.trim_end_matches('/') == wanted_url
            {
                return Ok(Some(card.name));
            }
        }
        Ok(None)
    }

    fn pin_agent(&self, conversation_id: ConversationId, name: &AgentName) -> DispatchResult<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| DispatchError::Internal(e.to_string()))?;
        sessions
            .entry(conversation_id)
            .or_default()
            .pinned_agent = Some(name.clone());
        Ok(())
    }

    fn store_session(
        &self,
        conversation_id: ConversationId,
        mut state: SessionState,
    ) -> DispatchResult<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| DispatchError::Internal(e.to_string()))?;
        // A concurrent worker may have re-pinned while this dispatch ran;
        // keep the freshest pin.
        if let Some(current) = sessions.get(&conversation_id)
            && state.pinned_agent.is_none()
        {
            state.pinned_agent = current.pinned_agent.clone();
        }
        sessions.insert(conversation_id, state);
        Ok(())
    }

    fn credential_snapshot(&self) -> DispatchResult<Option<String>> {
        let slot = self
            .credential
            .read()
            .map_err(|e| DispatchError::Internal(e.to_string()))?;
        Ok(slot.clone())
    }
}

/// Builds the outgoing request, merging the required metadata into the
/// message: the conversation id, a message id (reused when the input
/// already carries one, freshly generated otherwise), and any file
/// reference from the input metadata.
fn build_request(
    task_id: TaskId,
    conversation_id: ConversationId,
    mut message: Message,
) -> TaskSendRequest {
    let metadata = message.metadata_mut();
    if metadata.message_id.is_none() {
        metadata.message_id = Some(MessageId::new());
    }
    metadata.conversation_id = Some(conversation_id);

    let mut task_metadata = TaskMetadata::for_conversation(conversation_id);
    if let Some(reference) = &metadata.file_reference {
        task_metadata = task_metadata.with_file_reference(reference.clone());
    }

    TaskSendRequest::new(task_id, conversation_id, message, task_metadata)
}
