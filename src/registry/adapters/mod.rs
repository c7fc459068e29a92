//! Adapter implementations for agent discovery ports.

mod memory;

pub use memory::StaticCardResolver;
