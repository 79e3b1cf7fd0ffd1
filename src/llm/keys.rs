//! Per-provider API key lookup

use std::sync::Arc;
use tracing::{debug, warn};

use crate::storage::{KeyValueStore, StorageResult};

/// Storage key holding the API key for `provider`
pub fn api_key_storage_key(provider: &str) -> String {
    format!("{}_api_key", provider)
}

/// API keys kept in user storage, with an optional environment fallback.
///
/// A missing or blank key means "provider unavailable"; it is never an error.
#[derive(Clone)]
pub struct ApiKeyStore {
    store: Arc<dyn KeyValueStore>,
    env_fallback: bool,
}

impl ApiKeyStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            env_fallback: true,
        }
    }

    /// Enable or disable the environment-variable fallback
    pub fn with_env_fallback(mut self, enabled: bool) -> Self {
        self.env_fallback = enabled;
        self
    }

    /// Resolve the key for `provider`, consulting `env_var` if nothing is stored
    pub fn get(&self, provider: &str, env_var: Option<&str>) -> Option<String> {
        let stored = match self.store.get(&api_key_storage_key(provider)) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read API key for {}: {}", provider, e);
                None
            }
        };

        if let Some(key) = stored.filter(|k| !k.trim().is_empty()) {
            return Some(key);
        }

        if !self.env_fallback {
            return None;
        }

        env_var
            .and_then(|name| std::env::var(name).ok())
            .filter(|k| !k.trim().is_empty())
            .map(|key| {
                debug!("Using environment API key for {}", provider);
                key
            })
    }

    pub fn has_key(&self, provider: &str, env_var: Option<&str>) -> bool {
        self.get(provider, env_var).is_some()
    }

    /// Store a key for `provider`
    pub fn set(&self, provider: &str, key: &str) -> StorageResult<()> {
        self.store.set(&api_key_storage_key(provider), key.trim())
    }

    /// Forget the stored key for `provider`
    pub fn remove(&self, provider: &str) -> StorageResult<()> {
        self.store.remove(&api_key_storage_key(provider))
    }
}
