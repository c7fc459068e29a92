//! Adapter implementations for the task transport port.

mod memory;

pub use memory::ScriptedTransport;
