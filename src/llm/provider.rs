//! Provider trait and factory for LLM providers

use async_trait::async_trait;
use std::{sync::Arc, time::Duration};

use crate::llm::{
    anthropic::AnthropicProvider,
    errors::{LlmError, LlmResult},
    gemini::GeminiProvider,
    openai::OpenAIProvider,
    types::{PromptRequest, ProviderConfig, ProviderKind},
};

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send one prompt and return the extracted response text.
    ///
    /// The key is passed per call because it lives in user storage and may
    /// change between calls.
    async fn complete(&self, api_key: &str, request: &PromptRequest) -> LlmResult<String>;

    /// Static descriptor for this provider
    fn config(&self) -> &ProviderConfig;

    /// Get the provider name
    fn name(&self) -> &str {
        &self.config().name
    }

    /// Get the model name
    fn model(&self) -> &str {
        self.config().primary_model()
    }

    fn priority(&self) -> u32 {
        self.config().priority
    }

    /// Validate the configuration
    fn validate_config(&self) -> LlmResult<()> {
        let config = self.config();
        if config.name.trim().is_empty() {
            return Err(LlmError::ConfigError("Provider name is required".to_string()));
        }
        if config.endpoint.trim().is_empty() {
            return Err(LlmError::ConfigError(format!(
                "Endpoint is required for provider '{}'",
                config.name
            )));
        }
        if config.primary_model().is_empty() {
            return Err(LlmError::ConfigError(format!(
                "At least one model is required for provider '{}'",
                config.name
            )));
        }
        Ok(())
    }
}

/// Factory for creating LLM providers
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider from its descriptor
    pub fn create_provider(
        config: ProviderConfig,
        options: &ProviderClientOptions,
    ) -> LlmResult<Arc<dyn LlmProvider>> {
        let provider: Arc<dyn LlmProvider> = match config.kind {
            ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(config, options)?),
            ProviderKind::OpenAi => Arc::new(OpenAIProvider::new(config, options)?),
            ProviderKind::Gemini => Arc::new(GeminiProvider::new(config, options)?),
        };
        provider.validate_config()?;
        Ok(provider)
    }

    /// Create every configured provider
    pub fn create_all(
        configs: &[ProviderConfig],
        options: &ProviderClientOptions,
    ) -> LlmResult<Vec<Arc<dyn LlmProvider>>> {
        configs
            .iter()
            .cloned()
            .map(|config| Self::create_provider(config, options))
            .collect()
    }
}

/// Provider client options for flexible configuration
#[derive(Debug, Clone)]
pub struct ProviderClientOptions {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ProviderClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("NeuralForge/{}", crate::version::VERSION),
        }
    }
}

impl ProviderClientOptions {
    /// Build the HTTP client shared by one provider's requests
    pub fn build_client(&self) -> LlmResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()
            .map_err(|e| LlmError::ConfigError(format!("Failed to create HTTP client: {}", e)))
    }
}

/// Utility functions for provider implementations
pub mod utils {
    use super::*;

    /// Send a JSON request and decode a JSON response, mapping non-2xx
    /// statuses to `ApiError`
    pub async fn send_json<T>(request: reqwest::RequestBuilder) -> LlmResult<T>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(LlmError::ApiError(extract_error_message(response).await));
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Extract error message from HTTP response
    pub async fn extract_error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.text().await {
            Ok(text) => {
                if let Ok(json) = serde_json::from_str::<serde_json::Value>(&text) {
                    if let Some(error) = json.get("error") {
                        if let Some(message) = error.get("message") {
                            return format!("{}: {}", status, message.as_str().unwrap_or("Unknown error"));
                        }
                    }
                }
                format!("{}: {}", status, text)
            }
            Err(_) => format!("{}: Failed to read error response", status),
        }
    }

    /// Treat whitespace-only output as no answer
    pub fn non_empty(provider: &str, text: String) -> LlmResult<String> {
        if text.trim().is_empty() {
            Err(LlmError::EmptyResponse(provider.to_string()))
        } else {
            Ok(text)
        }
    }
}
