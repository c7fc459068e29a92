//! The host orchestrator: routing, session pinning, and dispatch.
//!
//! The orchestrator owns every piece of state the dispatch pipeline needs:
//! the agent registry, the task transport, the routing capability, both
//! stores, and the per-conversation session map, held as one explicit context
//! rather than process-wide statics. Its lifecycle is the lifecycle of
//! those resources.

pub mod error;
pub mod orchestrator;
pub mod router;
pub mod session;

pub use error::{DispatchError, DispatchResult};
pub use orchestrator::{DispatchOutcome, HostContext, HostOrchestrator};
pub use router::{AgentRouter, RouterError, RouterResult, RoutingRequest, StaticRouter};
pub use session::SessionState;

#[cfg(test)]
mod tests;
