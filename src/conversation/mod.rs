//! Conversations, messages, and the authoritative in-memory store.
//!
//! This module owns the canonical message format exchanged with remote
//! agents, the conversation aggregate, the event log, and the single-process
//! store that backs the client-facing read path. The store also owns the
//! [`cache::FileCache`] that replaces inline binary payloads with retrieval
//! references.
//!
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Store and cache errors in [`error`]
//! - The in-memory store in [`store`] and the file cache in [`cache`]

pub mod cache;
pub mod domain;
pub mod error;
pub mod store;

#[cfg(test)]
mod tests;
