//! Port contracts for agent discovery.

mod resolver;

pub use resolver::{CardResolver, ResolverError, ResolverResult};
