//! Routing port: picking an agent for an unpinned conversation.
//!
//! The decision itself is an external capability (typically an LLM-based
//! picker). This module defines the port, the prompt template adapters can
//! render, and a static adapter for tests.

use async_trait::async_trait;
use minijinja::{Environment, context};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

use crate::registry::domain::AgentSummary;

/// The routing prompt rendered for picker adapters.
const ROUTING_PROMPT_TEMPLATE: &str = "\
You are an intelligent router between users and specialised agents.

Here are the available agents:
{% for agent in agents %}- {{ agent.name }}: {{ agent.description }} ({{ agent.url }})
{% endfor %}
The user's request is:
\"\"\"{{ user_message }}\"\"\"

Pick the best agent for this request.
Reply with the agent's name or base URL and nothing else.
";

/// Result type for routing operations.
pub type RouterResult<T> = Result<T, RouterError>;

/// Everything a picker needs for one routing decision.
#[derive(Debug, Clone)]
pub struct RoutingRequest<'a> {
    /// The user message being routed.
    pub user_message: &'a str,

    /// Summaries of every registered agent.
    pub agents: &'a [AgentSummary],

    /// Credential for the external capability, when configured.
    pub credential: Option<&'a str>,
}

impl<'a> RoutingRequest<'a> {
    /// Creates a routing request without a credential.
    #[must_use]
    pub const fn new(user_message: &'a str, agents: &'a [AgentSummary]) -> Self {
        Self {
            user_message,
            agents,
            credential: None,
        }
    }

    /// Attaches the configured credential.
    #[must_use]
    pub const fn with_credential(mut self, credential: Option<&'a str>) -> Self {
        self.credential = credential;
        self
    }

    /// Renders the routing prompt for this request.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Template`] when rendering fails.
    pub fn prompt(&self) -> RouterResult<String> {
        let mut env = Environment::new();
        env.add_template("routing", ROUTING_PROMPT_TEMPLATE)
            .map_err(|e| RouterError::Template(e.to_string()))?;
        let template = env
            .get_template("routing")
            .map_err(|e| RouterError::Template(e.to_string()))?;
        template
            .render(context! {
                agents => self.agents,
                user_message => self.user_message,
            })
            .map_err(|e| RouterError::Template(e.to_string()))
    }
}

/// Picks an agent for a conversation with no pinned agent.
///
/// A picker may abstain by returning `Ok(None)`; the orchestrator then
/// falls back to the earliest-registered agent. The returned string may be
/// either an agent name or its base URL.
#[async_trait]
pub trait AgentRouter: Send + Sync {
    /// Makes one routing decision.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError`] when the external capability fails; the
    /// orchestrator treats any failure as an abstention.
    async fn pick_agent(&self, request: RoutingRequest<'_>) -> RouterResult<Option<String>>;
}

/// Errors returned by routing adapters.
#[derive(Debug, Clone, Error)]
pub enum RouterError {
    /// The call to the routing capability failed.
    #[error("routing call failed: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The capability's response did not decode.
    #[error("malformed routing response: {0}")]
    Decode(String),

    /// The routing prompt failed to render.
    #[error("routing prompt rendering failed: {0}")]
    Template(String),
}

impl RouterError {
    /// Wraps a transport-layer failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode(reason.into())
    }
}

/// Router adapter returning a fixed decision and counting invocations.
///
/// Suitable for unit tests only.
#[derive(Debug, Default)]
pub struct StaticRouter {
    choice: Option<String>,
    calls: AtomicUsize,
}

impl StaticRouter {
    /// Creates a router that always picks the given agent.
    #[must_use]
    pub fn picking(choice: impl Into<String>) -> Self {
        Self {
            choice: Some(choice.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Creates a router that always abstains.
    #[must_use]
    pub fn abstaining() -> Self {
        Self::default()
    }

    /// Returns how many routing decisions have been requested.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AgentRouter for StaticRouter {
    async fn pick_agent(&self, _request: RoutingRequest<'_>) -> RouterResult<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.choice.clone())
    }
}
