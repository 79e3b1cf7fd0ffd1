//! Agent persistence and selection

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{default_agents, Agent, AgentError, LastUsed, NewAgent};
use crate::storage::{KeyValueStore, AGENTS_KEY};

/// Reads and writes the `agents` list in the key-value store
pub struct AgentRegistry {
    store: Arc<dyn KeyValueStore>,
}

impl AgentRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All agents. Missing or unreadable data yields the built-in defaults.
    pub fn list(&self) -> Vec<Agent> {
        let raw = match self.store.get(AGENTS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored agents, using defaults");
                return default_agents();
            }
            Err(e) => {
                warn!("Failed to read agents, using defaults: {}", e);
                return default_agents();
            }
        };

        match parse_agents(&raw) {
            Some(agents) if !agents.is_empty() => agents,
            _ => default_agents(),
        }
    }

    /// Look up one agent by id
    pub fn get(&self, id: &str) -> Option<Agent> {
        self.list().into_iter().find(|agent| agent.id == id)
    }

    /// Create an agent from form input and persist it
    pub fn create(&self, form: NewAgent) -> Result<Agent, AgentError> {
        let agent = form.into_agent()?;
        let mut agents = self.list();
        agents.push(agent.clone());
        self.save_all(&agents)?;

        info!("Created agent '{}' ({})", agent.name, agent.id);
        Ok(agent)
    }

    /// Mark `id` as the active agent and stamp its last use
    pub fn select(&self, id: &str) -> Result<Agent, AgentError> {
        let mut agents = self.list();
        if !agents.iter().any(|agent| agent.id == id) {
            return Err(AgentError::NotFound(id.to_string()));
        }

        let now = Utc::now();
        let mut selected = None;
        for agent in agents.iter_mut() {
            agent.is_active = agent.id == id;
            if agent.is_active {
                agent.last_used = LastUsed::At(now);
                selected = Some(agent.clone());
            }
        }
        self.save_all(&agents)?;

        selected.ok_or_else(|| AgentError::NotFound(id.to_string()))
    }

    /// Replace the stored agent list
    pub fn save_all(&self, agents: &[Agent]) -> Result<(), AgentError> {
        let raw = serde_json::to_string(agents)?;
        self.store.set(AGENTS_KEY, &raw)?;
        debug!("Saved {} agents", agents.len());
        Ok(())
    }
}

/// Decode the stored list. `None` when the blob is not a JSON list;
/// entries that fail to decode or validate are dropped one by one.
fn parse_agents(raw: &str) -> Option<Vec<Agent>> {
    let entries: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Stored agent list is malformed, using defaults: {}", e);
            return None;
        }
    };

    let agents = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<Agent>(entry) {
            Ok(agent) => match agent.validate() {
                Ok(()) => Some(agent),
                Err(e) => {
                    warn!("Dropping stored agent '{}': {}", agent.id, e);
                    None
                }
            },
            Err(e) => {
                warn!("Dropping unreadable agent at index {}: {}", index, e);
                None
            }
        })
        .collect();
    Some(agents)
}
