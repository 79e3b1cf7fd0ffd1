//! Agent personas
//!
//! An agent is a configured AI persona the user converses with. Agents are
//! persisted as one JSON list under the `agents` storage key.

mod defaults;
mod registry;

pub use defaults::*;
pub use registry::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised while creating or selecting agents
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Invalid agent: {0}")]
    Invalid(String),

    #[error("Agent not found: {0}")]
    NotFound(String),

    #[error("Failed to persist agents: {0}")]
    Storage(#[from] crate::storage::StorageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// When an agent was last selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LastUsed {
    Never,
    At(DateTime<Utc>),
}

impl TryFrom<String> for LastUsed {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "Never" {
            return Ok(LastUsed::Never);
        }
        DateTime::parse_from_rfc3339(&value)
            .map(|ts| LastUsed::At(ts.with_timezone(&Utc)))
            .map_err(|e| format!("invalid lastUsed value '{}': {}", value, e))
    }
}

impl From<LastUsed> for String {
    fn from(value: LastUsed) -> Self {
        value.to_string()
    }
}

impl fmt::Display for LastUsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastUsed::Never => write!(f, "Never"),
            LastUsed::At(ts) => write!(f, "{}", ts.to_rfc3339()),
        }
    }
}

/// A configured AI persona
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub agent_type: String,
    pub avatar: String,
    pub capabilities: Vec<String>,
    pub is_active: bool,
    pub last_used: LastUsed,
}

impl Agent {
    /// Capabilities joined for prompts and display
    pub fn capability_list(&self) -> String {
        self.capabilities.join(", ")
    }

    /// Check the fields prompts and fallback text are built from
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.id.trim().is_empty() {
            return Err(AgentError::Invalid("id is required".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(AgentError::Invalid("name is required".to_string()));
        }
        if self.agent_type.trim().is_empty() {
            return Err(AgentError::Invalid("type is required".to_string()));
        }
        if self.capabilities.iter().all(|c| c.trim().is_empty()) {
            return Err(AgentError::Invalid(
                "at least one capability is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Form input for a user-created agent
#[derive(Debug, Clone, Default)]
pub struct NewAgent {
    pub name: String,
    pub description: String,
    pub agent_type: String,
    pub avatar: Option<String>,
    pub capabilities: Vec<String>,
}

impl NewAgent {
    /// Build the agent, assigning a fresh id
    pub fn into_agent(self) -> Result<Agent, AgentError> {
        let agent = Agent {
            id: uuid::Uuid::new_v4().to_string(),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            agent_type: self.agent_type.trim().to_string(),
            avatar: self.avatar.unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            capabilities: self
                .capabilities
                .into_iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            is_active: false,
            last_used: LastUsed::Never,
        };
        agent.validate()?;
        Ok(agent)
    }
}
