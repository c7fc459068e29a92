//! The agent registry service.
//!
//! Resolves base URLs to Agent Cards through the [`CardResolver`] port and
//! keeps the registered cards in registration order. Batch registration
//! skips unreachable peers: availability over completeness, by contract.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::registry::domain::{AgentCard, AgentName, AgentSummary};
use crate::registry::ports::{CardResolver, ResolverError};

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors returned by the agent registry.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// Card resolution failed.
    #[error(transparent)]
    Resolver(#[from] ResolverError),

    /// The internal lock was poisoned by a panicking writer.
    #[error("registry lock poisoned: {0}")]
    LockPoisoned(String),
}

/// A peer skipped during batch registration.
#[derive(Debug, Clone)]
pub struct SkippedAgent {
    /// The base URL that could not be registered.
    pub url: String,
    /// The resolution failure.
    pub reason: ResolverError,
}

/// Outcome of a batch registration: what registered, what was skipped.
#[derive(Debug, Clone, Default)]
pub struct BatchRegistration {
    /// Cards registered successfully, in request order.
    pub registered: Vec<AgentCard>,
    /// Peers skipped with their failure reasons.
    pub skipped: Vec<SkippedAgent>,
}

#[derive(Debug, Default)]
struct RegistryState {
    cards: HashMap<AgentName, AgentCard>,
    order: Vec<AgentName>,
}

/// Registry of remote agents, keyed by card name.
#[derive(Debug)]
pub struct AgentRegistry<R>
where
    R: CardResolver,
{
    resolver: Arc<R>,
    state: RwLock<RegistryState>,
}

impl<R> AgentRegistry<R>
where
    R: CardResolver,
{
    /// Creates an empty registry over the given resolver.
    #[must_use]
    pub fn new(resolver: Arc<R>) -> Self {
        Self {
            resolver,
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// Resolves and registers the agent served at `base_url`.
    ///
    /// Re-registering a name replaces the stored card; the original
    /// registration position is kept.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Resolver`] when the peer is unreachable or
    /// its descriptor is malformed, and [`RegistryError::LockPoisoned`] on
    /// a poisoned lock.
    pub async fn register(&self, base_url: &str) -> RegistryResult<AgentCard> {
        let card = self.resolver.resolve(base_url).await?;
        self.insert(card.clone())?;
        Ok(card)
    }

    /// Registers every reachable agent in `base_urls`, skipping the rest.
    ///
    /// A single unreachable peer never fails the batch: its url and failure
    /// reason are reported in the outcome and logged, and registration
    /// continues.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] on a poisoned lock; resolver
    /// failures are collected per-peer, never raised.
    pub async fn register_all<I, S>(&self, base_urls: I) -> RegistryResult<BatchRegistration>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut outcome = BatchRegistration::default();
        for base_url in base_urls {
            let url = base_url.as_ref();
            match self.resolver.resolve(url).await {
                Ok(card) => {
                    self.insert(card.clone())?;
                    outcome.registered.push(card);
                }
                Err(reason) => {
                    tracing::warn!(%url, %reason, "skipping unreachable agent");
                    outcome.skipped.push(SkippedAgent {
                        url: url.to_owned(),
                        reason,
                    });
                }
            }
        }
        Ok(outcome)
    }

    /// Looks up a card by agent name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] on a poisoned lock.
    pub fn get(&self, name: &AgentName) -> RegistryResult<Option<AgentCard>> {
        let state = self.read()?;
        Ok(state.cards.get(name).cloned())
    }

    /// Returns all registered cards in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] on a poisoned lock.
    pub fn list(&self) -> RegistryResult<Vec<AgentCard>> {
        let state = self.read()?;
        Ok(state
            .order
            .iter()
            .filter_map(|name| state.cards.get(name))
            .cloned()
            .collect())
    }

    /// Returns routing summaries for all registered cards.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] on a poisoned lock.
    pub fn summaries(&self) -> RegistryResult<Vec<AgentSummary>> {
        Ok(self.list()?.iter().map(AgentCard::summary).collect())
    }

    /// Returns the earliest-registered card, if any.
    ///
    /// Used as the routing fallback when the external picker abstains.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] on a poisoned lock.
    pub fn first(&self) -> RegistryResult<Option<AgentCard>> {
        let state = self.read()?;
        Ok(state
            .order
            .first()
            .and_then(|name| state.cards.get(name))
            .cloned())
    }

    fn insert(&self, card: AgentCard) -> RegistryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| RegistryError::LockPoisoned(e.to_string()))?;
        if !state.cards.contains_key(&card.name) {
            state.order.push(card.name.clone());
        }
        state.cards.insert(card.name.clone(), card);
        Ok(())
    }

    fn read(&self) -> RegistryResult<std::sync::RwLockReadGuard<'_, RegistryState>> {
        self.state
            .read()
            .map_err(|e| RegistryError::LockPoisoned(e.to_string()))
    }
}
