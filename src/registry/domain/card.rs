//! Agent Card: the descriptor a remote agent exposes about itself.

use serde::{Deserialize, Serialize};

use super::AgentName;

/// Capability flags advertised by an agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCapabilities {
    /// The agent supports streamed task updates.
    #[serde(default)]
    pub streaming: bool,

    /// The agent supports push notifications.
    #[serde(default)]
    pub push_notifications: bool,
}

impl AgentCapabilities {
    /// Creates capability flags.
    #[must_use]
    pub const fn new(streaming: bool, push_notifications: bool) -> Self {
        Self {
            streaming,
            push_notifications,
        }
    }
}

/// A skill advertised on an agent card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSkill {
    /// Stable skill identifier.
    pub id: String,

    /// Human-readable skill name.
    pub name: String,

    /// Optional skill description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AgentSkill {
    /// Creates a skill entry.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
        }
    }

    /// Sets the skill description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Descriptor a remote agent exposes: name, description, endpoint, and
/// capabilities.
///
/// The name is the unique registry key; re-registering a name replaces the
/// stored card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCard {
    /// Unique agent name.
    pub name: AgentName,

    /// What the agent does, in the agent's own words. Routing decisions
    /// are made from this text.
    pub description: String,

    /// Base URL the agent serves its task endpoint from.
    pub url: String,

    /// Advertised capability flags.
    #[serde(default)]
    pub capabilities: AgentCapabilities,

    /// Advertised skills.
    #[serde(default)]
    pub skills: Vec<AgentSkill>,
}

impl AgentCard {
    /// Creates a card with no skills and default capabilities.
    #[must_use]
    pub fn new(name: AgentName, description: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name,
            description: description.into(),
            url: url.into(),
            capabilities: AgentCapabilities::default(),
            skills: Vec::new(),
        }
    }

    /// Sets the capability flags.
    #[must_use]
    pub const fn with_capabilities(mut self, capabilities: AgentCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Adds a skill.
    #[must_use]
    pub fn with_skill(mut self, skill: AgentSkill) -> Self {
        self.skills.push(skill);
        self
    }

    /// Returns the routing summary for this card.
    #[must_use]
    pub fn summary(&self) -> AgentSummary {
        AgentSummary {
            name: self.name.as_str().to_owned(),
            description: self.description.clone(),
            url: self.url.clone(),
        }
    }
}

/// The slice of a card handed to the routing capability: name, description,
/// and url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSummary {
    /// Agent name.
    pub name: String,
    /// Agent description.
    pub description: String,
    /// Agent base URL.
    pub url: String,
}
