//! Shared helpers for in-memory integration tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::DefaultClock;
use serde::Serialize;
use serde_json::Value;

use switchboard::api::envelope::{ApiError, ApiRequest, ApiResponse, methods};
use switchboard::api::service::ConversationService;
use switchboard::client::transport::{ApiTransport, ClientError, ClientResult};
use switchboard::conversation::cache::CacheId;
use switchboard::conversation::domain::{
    ConversationId, Message, MessageMetadata, Part, Role,
};
use switchboard::conversation::store::ConversationStore;
use switchboard::host::orchestrator::HostContext;
use switchboard::host::router::StaticRouter;
use switchboard::registry::adapters::StaticCardResolver;
use switchboard::registry::domain::{AgentCapabilities, AgentCard, AgentName};
use switchboard::registry::services::AgentRegistry;
use switchboard::remote::adapters::ScriptedTransport;
use switchboard::task::store::TaskStore;

/// The fully in-memory backend used across the integration tests.
pub type TestService =
    ConversationService<StaticCardResolver, ScriptedTransport, StaticRouter, DefaultClock>;

/// Builds an agent card named `name` served from `http://{name}.example`.
pub fn card(name: &str, streaming: bool) -> AgentCard {
    AgentCard::new(
        AgentName::new(name).expect("valid name"),
        format!("{name} agent"),
        format!("http://{name}.example"),
    )
    .with_capabilities(AgentCapabilities::new(streaming, false))
}

/// Builds a backend over the given transport script with the given agents
/// registered.
pub async fn service_with(
    transport: ScriptedTransport,
    router: StaticRouter,
    cards: Vec<AgentCard>,
) -> Arc<TestService> {
    let mut resolver = StaticCardResolver::new();
    let urls: Vec<String> = cards.iter().map(|c| c.url.clone()).collect();
    for c in cards {
        resolver = resolver.with_card(c.url.clone(), c);
    }

    let registry = Arc::new(AgentRegistry::new(Arc::new(resolver)));
    let service = Arc::new(ConversationService::new(HostContext {
        registry,
        transport: Arc::new(transport),
        router: Arc::new(router),
        store: Arc::new(ConversationStore::new()),
        tasks: Arc::new(TaskStore::new()),
        clock: Arc::new(DefaultClock),
    }));

    service
        .register_agents(&urls)
        .await
        .expect("agents register");
    service
}

/// Builds a user message bound to a conversation.
pub fn user_message(conversation_id: ConversationId, text: &str) -> Message {
    Message::builder(Role::User)
        .with_part(Part::text(text))
        .with_metadata(MessageMetadata::for_conversation(conversation_id))
        .build()
        .expect("valid message")
}

/// Polls until every dispatched message has completed.
///
/// # Errors
///
/// Fails when workers have not drained within the deadline.
pub async fn wait_until_idle(service: &TestService) -> eyre::Result<()> {
    for _ in 0..250 {
        if service.pending_messages()?.is_empty() {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    eyre::bail!("pending messages did not drain")
}

/// Extracts the cache id from a rewritten file-part uri.
pub fn cache_id_from_uri(uri: &str) -> CacheId {
    uri.rsplit('/')
        .next()
        .expect("uri has id segment")
        .parse()
        .expect("valid cache id")
}

/// In-process transport binding the typed client directly to the service
/// facade, speaking the same envelope an HTTP shell would.
pub struct LocalTransport {
    service: Arc<TestService>,
}

impl LocalTransport {
    /// Creates a transport over the given backend.
    #[must_use]
    pub fn new(service: Arc<TestService>) -> Self {
        Self { service }
    }
}

fn respond<T, E>(result: Result<T, E>) -> ClientResult<ApiResponse<Value>>
where
    T: Serialize,
    E: std::fmt::Display,
{
    match result {
        Ok(value) => serde_json::to_value(value)
            .map(ApiResponse::ok)
            .map_err(|e| ClientError::Decode(e.to_string())),
        Err(error) => Ok(ApiResponse::err(ApiError::new(error.to_string()))),
    }
}

fn decode<T>(params: Value) -> ClientResult<T>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(params).map_err(|e| ClientError::Decode(e.to_string()))
}

#[async_trait]
impl ApiTransport for LocalTransport {
    async fn call(&self, request: ApiRequest<Value>) -> ClientResult<ApiResponse<Value>> {
        let params = request.params;
        match request.method.as_str() {
            methods::CONVERSATION_CREATE => respond(self.service.create_conversation()),
            methods::CONVERSATION_LIST => respond(self.service.list_conversations()),
            methods::MESSAGE_SEND => {
                let message: Message = decode(params)?;
                respond(self.service.send_message(message))
            }
            methods::MESSAGE_LIST => {
                let conversation_id: ConversationId = decode(params)?;
                respond(self.service.list_messages(conversation_id))
            }
            methods::MESSAGE_PENDING => respond(self.service.pending_messages()),
            methods::MESSAGE_FILE => {
                let id: CacheId = decode(params)?;
                respond(self.service.get_file(id))
            }
            methods::TASK_LIST => respond(self.service.list_tasks()),
            methods::EVENT_LIST => respond(self.service.list_events()),
            methods::AGENT_REGISTER => {
                let url: String = decode(params)?;
                respond(self.service.register_agent(&url).await)
            }
            methods::AGENT_LIST => respond(self.service.list_agents()),
            methods::CREDENTIAL_UPDATE => {
                let credential: String = decode(params)?;
                respond(self.service.update_credential(credential))
            }
            other => Ok(ApiResponse::err(ApiError::new(format!(
                "unknown method: {other}"
            )))),
        }
    }
}

/// Transport whose every call fails, for read-degradation tests.
#[derive(Debug, Default)]
pub struct FailingTransport;

#[async_trait]
impl ApiTransport for FailingTransport {
    async fn call(&self, _request: ApiRequest<Value>) -> ClientResult<ApiResponse<Value>> {
        Err(ClientError::http(503, "backend unavailable"))
    }
}
