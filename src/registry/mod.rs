//! Agent Card resolution and the agent registry.
//!
//! Remote agents advertise a descriptor document, the Agent Card, at a
//! well-known location under their base URL. The registry resolves cards
//! through the [`ports::CardResolver`] port, stores them by validated name,
//! and deliberately skips unreachable peers during batch registration: one
//! dead agent never takes discovery down with it.
//!
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The registry service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
