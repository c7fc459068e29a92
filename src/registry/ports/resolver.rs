//! Card resolution port: fetching an agent's descriptor document.

use async_trait::async_trait;
use thiserror::Error;

use crate::registry::domain::AgentCard;

/// Result type for card resolution.
pub type ResolverResult<T> = Result<T, ResolverError>;

/// Fetches the well-known Agent Card descriptor from a base URL.
///
/// Implementations own the transport (HTTP in production, a static map in
/// tests); the registry only sees cards or the two failure classes below.
#[async_trait]
pub trait CardResolver: Send + Sync {
    /// Resolves the card served at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::Unreachable`] when the peer cannot be
    /// reached and [`ResolverError::Malformed`] when the descriptor body
    /// does not decode.
    async fn resolve(&self, base_url: &str) -> ResolverResult<AgentCard>;
}

/// Errors returned by card resolver implementations.
#[derive(Debug, Clone, Error)]
pub enum ResolverError {
    /// The peer could not be reached.
    #[error("agent at {url} is unreachable: {reason}")]
    Unreachable {
        /// The base URL that failed.
        url: String,
        /// Description of the transport failure.
        reason: String,
    },

    /// The descriptor document did not decode.
    #[error("malformed agent card from {url}: {reason}")]
    Malformed {
        /// The base URL that served the document.
        url: String,
        /// Description of the decode failure.
        reason: String,
    },
}

impl ResolverError {
    /// Creates an unreachable-peer error.
    #[must_use]
    pub fn unreachable(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unreachable {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a malformed-descriptor error.
    #[must_use]
    pub fn malformed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
