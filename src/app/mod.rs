//! Core application wiring
//!
//! This module builds the storage, agent registry, session store and
//! provider resolver from configuration and hands out conversations.

use anyhow::{anyhow, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    agent::{Agent, AgentRegistry},
    config::Config,
    llm::{ApiKeyStore, ProviderFactory, ProviderResolver},
    session::{Conversation, SessionStore},
    storage::{KeyValueStore, SqliteStore},
};

/// Main application structure
pub struct App {
    config: Config,
    keys: ApiKeyStore,
    agents: AgentRegistry,
    sessions: Arc<SessionStore>,
    resolver: Arc<ProviderResolver>,
}

impl App {
    /// Create an application backed by the on-disk database
    pub fn new(config: Config) -> Result<Self> {
        let store = SqliteStore::open(config.database_path())?;
        Self::with_store(config, Arc::new(store))
    }

    /// Create an application over any key-value store
    pub fn with_store(config: Config, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        debug!("Creating new App instance");
        config.validate()?;

        let keys = ApiKeyStore::new(store.clone()).with_env_fallback(config.env_key_fallback);
        let providers = ProviderFactory::create_all(&config.providers, &config.client_options())?;
        let resolver = Arc::new(ProviderResolver::new(
            providers,
            keys.clone(),
            config.resolver_options(),
        ));

        info!(
            "Providers in priority order: {}",
            resolver.provider_names().join(", ")
        );

        Ok(Self {
            agents: AgentRegistry::new(store.clone()),
            sessions: Arc::new(SessionStore::new(store)),
            keys,
            resolver,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn keys(&self) -> &ApiKeyStore {
        &self.keys
    }

    pub fn agents(&self) -> &AgentRegistry {
        &self.agents
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    pub fn resolver(&self) -> &Arc<ProviderResolver> {
        &self.resolver
    }

    /// Whether `name` is one of the configured providers
    pub fn is_known_provider(&self, name: &str) -> bool {
        self.config.providers.iter().any(|p| p.name == name)
    }

    /// Select an agent and open its conversation
    pub async fn open_conversation(&self, agent_id: &str) -> Result<Conversation> {
        let agent: Agent = self
            .agents
            .select(agent_id)
            .map_err(|e| anyhow!("Cannot open conversation: {}", e))?;

        Ok(Conversation::open(agent, self.sessions.clone(), self.resolver.clone()).await)
    }
}
