//! Orchestration services for agent discovery.

mod registry;

pub use registry::{AgentRegistry, BatchRegistration, RegistryError, RegistryResult, SkippedAgent};
