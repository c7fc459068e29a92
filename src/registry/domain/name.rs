//! Validated agent name type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum accepted length for an agent name.
const MAX_NAME_LENGTH: usize = 200;

/// Validated agent name: the unique registry key for a card.
///
/// Names come from remote descriptor documents, so only minimal hygiene is
/// imposed: surrounding whitespace is trimmed and the result must be
/// non-empty and of sane length. Case and interior punctuation are the
/// remote's business.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentName(String);

impl AgentName {
    /// Creates a validated agent name.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidAgentName::Empty`] when the value is empty after
    /// trimming, or [`InvalidAgentName::TooLong`] when it exceeds 200
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, InvalidAgentName> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(InvalidAgentName::Empty);
        }
        if trimmed.len() > MAX_NAME_LENGTH {
            return Err(InvalidAgentName::TooLong(raw));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the agent name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AgentName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AgentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised when validating an agent name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidAgentName {
    /// The name was empty after trimming.
    #[error("agent name must not be empty")]
    Empty,

    /// The name exceeded the accepted length.
    #[error("agent name too long: '{0}'")]
    TooLong(String),
}
