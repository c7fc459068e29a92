//! Per-agent connections to remote task executors.
//!
//! A connection wraps one agent's card and the task transport, issuing task
//! requests synchronously or as a streamed sequence of updates depending on
//! the card's advertised capabilities. Only the latest received status is
//! authoritative, and a streaming session that closes without any update is
//! an accepted outcome, not a fault.

pub mod adapters;
pub mod connection;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
