use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::debug;

use crate::llm::{default_providers, ProviderClientOptions, ProviderConfig, ResolverOptions};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Data directory holding the key-value database
    pub data_dir: PathBuf,

    /// Per-attempt provider timeout in milliseconds
    pub request_timeout_ms: u64,

    /// Maximum tokens for responses
    pub max_tokens: u32,

    /// Temperature for sampling
    pub temperature: Option<f32>,

    /// Whether API keys may come from environment variables
    pub env_key_fallback: bool,

    /// Remote providers, tried in ascending priority
    pub providers: Vec<ProviderConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .map(|dir| dir.join("neuralforge"))
                .unwrap_or_else(|| PathBuf::from("./data")),
            request_timeout_ms: 30_000,
            max_tokens: 1024,
            temperature: Some(0.7),
            env_key_fallback: true,
            providers: default_providers(),
        }
    }
}

impl Config {
    /// Initialize configuration from various sources.
    ///
    /// `data_dir` (from the command line) wins over file and environment.
    pub async fn init(data_dir: Option<PathBuf>) -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = Self::load_from_file().await?.unwrap_or_default();

        // Environment overrides the file
        config.load_from_env();
        config.prepare_data_dir(data_dir)?;

        Ok(config)
    }

    /// Apply a data directory override, expand it and make sure it exists
    pub fn prepare_data_dir(&mut self, data_dir: Option<PathBuf>) -> Result<()> {
        if let Some(data_dir) = data_dir {
            self.data_dir = data_dir;
        }
        self.data_dir = expand_path(&self.data_dir);

        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir).map_err(|e| {
                anyhow::anyhow!(
                    "Failed to create data directory {}: {}",
                    self.data_dir.display(),
                    e
                )
            })?;
        }
        Ok(())
    }

    /// Load configuration from environment variables
    pub fn load_from_env(&mut self) {
        if let Ok(data_dir) = std::env::var("NEURALFORGE_DATA_DIR") {
            self.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(timeout) = std::env::var("NEURALFORGE_TIMEOUT") {
            match parse_timeout(&timeout) {
                Some(duration) => self.request_timeout_ms = duration.as_millis() as u64,
                None => debug!("Ignoring NEURALFORGE_TIMEOUT '{}'", timeout),
            }
        }

        if let Ok(max_tokens_str) = std::env::var("NEURALFORGE_MAX_TOKENS") {
            if let Ok(max_tokens) = max_tokens_str.parse() {
                self.max_tokens = max_tokens;
            }
        }

        if let Ok(temp_str) = std::env::var("NEURALFORGE_TEMPERATURE") {
            if let Ok(temperature) = temp_str.parse() {
                self.temperature = Some(temperature);
            }
        }

        if let Ok(env_keys) = std::env::var("NEURALFORGE_ENV_KEYS") {
            self.env_key_fallback = env_keys.to_lowercase() != "false";
        }
    }

    /// Load configuration from neuralforge.json files
    pub async fn load_from_file() -> Result<Option<Self>> {
        // 1. ./.neuralforge.json
        // 2. ./neuralforge.json
        // 3. $CONFIG/neuralforge/neuralforge.json
        let mut config_paths = vec![
            PathBuf::from("./.neuralforge.json"),
            PathBuf::from("./neuralforge.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("neuralforge").join("neuralforge.json"));
        }

        for path in config_paths {
            if path.exists() {
                debug!("Loading configuration from: {}", path.display());
                let content = tokio::fs::read_to_string(&path).await?;
                let config: Self = serde_json::from_str(&content)
                    .map_err(|e| anyhow::anyhow!("Invalid configuration in {}: {}", path.display(), e))?;
                return Ok(Some(config));
            }
        }

        Ok(None)
    }

    /// Path of the key-value database
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("neuralforge.db")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn client_options(&self) -> ProviderClientOptions {
        ProviderClientOptions {
            timeout: self.request_timeout(),
            ..ProviderClientOptions::default()
        }
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            attempt_timeout: Some(self.request_timeout()),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for provider in &self.providers {
            if provider.name.trim().is_empty() {
                return Err(anyhow::anyhow!("Provider name is required"));
            }
            if !names.insert(provider.name.as_str()) {
                return Err(anyhow::anyhow!("Duplicate provider name: {}", provider.name));
            }
            if provider.endpoint.trim().is_empty() {
                return Err(anyhow::anyhow!("Provider {} has no endpoint", provider.name));
            }
            if provider.primary_model().is_empty() {
                return Err(anyhow::anyhow!("Provider {} has no models", provider.name));
            }
        }

        if self.max_tokens == 0 {
            return Err(anyhow::anyhow!("max_tokens must be greater than 0"));
        }

        if self.request_timeout_ms == 0 {
            return Err(anyhow::anyhow!("request_timeout_ms must be greater than 0"));
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(anyhow::anyhow!("temperature must be between 0.0 and 2.0"));
            }
        }

        Ok(())
    }
}

/// Parse a humantime duration such as `500ms` or `1m 30s`; zero is rejected
fn parse_timeout(value: &str) -> Option<Duration> {
    humantime::parse_duration(value.trim())
        .ok()
        .filter(|duration| duration.as_millis() > 0)
}

/// Expand `~` and environment variables in a configured path
fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            debug!("Could not expand {}: {}", raw, e);
            path.to_path_buf()
        }
    }
}
