//! In-memory card resolver for tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::registry::domain::AgentCard;
use crate::registry::ports::{CardResolver, ResolverError, ResolverResult};

/// Thread-safe in-memory card resolver.
///
/// Serves cards from a url-keyed map; any url not in the map behaves as an
/// unreachable peer, and urls marked malformed serve an undecodable
/// descriptor. Suitable for unit tests only.
#[derive(Debug, Default)]
pub struct StaticCardResolver {
    cards: RwLock<HashMap<String, AgentCard>>,
    malformed: RwLock<HashSet<String>>,
}

impl StaticCardResolver {
    /// Creates an empty resolver; every lookup is unreachable.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a card served at the given base URL.
    #[must_use]
    pub fn with_card(self, base_url: impl Into<String>, card: AgentCard) -> Self {
        if let Ok(mut cards) = self.cards.write() {
            cards.insert(base_url.into(), card);
        }
        self
    }

    /// Marks a base URL as serving a descriptor that does not decode.
    #[must_use]
    pub fn with_malformed_card(self, base_url: impl Into<String>) -> Self {
        if let Ok(mut malformed) = self.malformed.write() {
            malformed.insert(base_url.into());
        }
        self
    }
}

#[async_trait]
impl CardResolver for StaticCardResolver {
    async fn resolve(&self, base_url: &str) -> ResolverResult<AgentCard> {
        if let Ok(malformed) = self.malformed.read()
            && malformed.contains(base_url)
        {
            return Err(ResolverError::malformed(base_url, "invalid descriptor body"));
        }

        let cards = self
            .cards
            .read()
            .map_err(|e| ResolverError::unreachable(base_url, e.to_string()))?;
        cards
            .get(base_url)
            .cloned()
            .ok_or_else(|| ResolverError::unreachable(base_url, "connection refused"))
    }
}
