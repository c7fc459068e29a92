//! Switchboard: a host for conversations with remote task-execution agents.
//!
//! This crate routes user messages to specialised remote agents, tracks each
//! delegated task through its lifecycle state machine, caches binary payloads
//! referenced by messages, and reconciles the authoritative server-side
//! conversation history against a client's locally-optimistic view.
//!
//! # Architecture
//!
//! Switchboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external collaborators
//! - **Adapters**: Concrete implementations of ports (in-memory, test fakes)
//! - **Services**: Orchestration over domain types and ports
//!
//! The remote agent "brains", the HTTP shell, and file-text extraction are
//! external collaborators reached through ports; the crate owns everything
//! between the request envelope and the task-update stream.
//!
//! # Modules
//!
//! - [`registry`]: Agent Card resolution and the agent registry
//! - [`conversation`]: Conversations, messages, the store, and the file cache
//! - [`task`]: Task aggregate and lifecycle state machine
//! - [`remote`]: Per-agent connections and the task transport port
//! - [`host`]: Session state, routing policy, and the host orchestrator
//! - [`api`]: Request/response envelope and the backend service facade
//! - [`client`]: Typed backend client and the polling client view
//! - [`reconcile`]: Server/local message history merge
//! - [`worker`]: Supervised per-message dispatch workers

pub mod api;
pub mod client;
pub mod conversation;
pub mod host;
pub mod reconcile;
pub mod registry;
pub mod remote;
pub mod task;
pub mod worker;
