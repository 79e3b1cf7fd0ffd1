//! Multi-provider response resolution with deterministic local fallback

use chrono::Utc;
use std::{sync::Arc, time::Duration};
use tracing::{debug, info, warn};

use crate::{
    agent::Agent,
    llm::{
        errors::{LlmError, LlmResult},
        fallback::{self, FALLBACK_PROVIDER, GREETING_PROVIDER, TEMPLATE_MODEL},
        keys::ApiKeyStore,
        provider::LlmProvider,
        types::{GeneratedResponse, PromptRequest},
    },
};

/// Generation parameters shared by every attempt
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Upper bound for a single provider attempt; `None` relies on the transport
    pub attempt_timeout: Option<Duration>,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            attempt_timeout: Some(Duration::from_secs(30)),
            max_tokens: 1024,
            temperature: Some(0.7),
        }
    }
}

/// Tries providers in ascending priority and returns the first answer
pub struct ProviderResolver {
    providers: Vec<Arc<dyn LlmProvider>>,
    keys: ApiKeyStore,
    options: ResolverOptions,
}

impl ProviderResolver {
    pub fn new(
        mut providers: Vec<Arc<dyn LlmProvider>>,
        keys: ApiKeyStore,
        options: ResolverOptions,
    ) -> Self {
        // Stable: equal priorities keep configuration order
        providers.sort_by_key(|provider| provider.priority());
        Self {
            providers,
            keys,
            options,
        }
    }

    /// Provider names in the order they are attempted
    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// Providers that currently have a key. Display only.
    pub fn available_providers(&self) -> Vec<String> {
        self.providers
            .iter()
            .filter(|p| self.keys.has_key(p.name(), p.config().env_var.as_deref()))
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Produce a reply for `message`. Never fails and never returns empty text.
    pub async fn generate(&self, message: &str, agent: &Agent, is_greeting: bool) -> GeneratedResponse {
        if is_greeting {
            let text = fallback::greeting(agent, &mut rand::thread_rng());
            return local_response(text, GREETING_PROVIDER);
        }

        if message.trim().is_empty() {
            warn!("Empty message for agent {}, using fallback text", agent.id);
            return self.fallback(agent);
        }

        let request = PromptRequest {
            system: persona_prompt(agent),
            message: message.to_string(),
            max_tokens: self.options.max_tokens,
            temperature: self.options.temperature,
        };

        for provider in &self.providers {
            let api_key = match self.api_key_for(provider.as_ref()) {
                Ok(key) => key,
                Err(e) => {
                    debug!("Skipping provider {}: {}", provider.name(), e);
                    continue;
                }
            };

            match self.attempt(provider.as_ref(), &api_key, &request).await {
                Ok(text) => {
                    info!("Response from provider {} ({})", provider.name(), provider.model());
                    return GeneratedResponse {
                        text,
                        provider: provider.name().to_string(),
                        model: provider.model().to_string(),
                        timestamp: Utc::now(),
                    };
                }
                Err(e) => {
                    warn!("Provider {} failed: {}", provider.name(), e);
                }
            }
        }

        debug!("No provider answered for agent {}, using fallback text", agent.id);
        self.fallback(agent)
    }

    fn api_key_for(&self, provider: &dyn LlmProvider) -> LlmResult<String> {
        self.keys
            .get(provider.name(), provider.config().env_var.as_deref())
            .ok_or_else(|| LlmError::Unavailable(format!("no API key for {}", provider.name())))
    }

    /// One request against one provider, bounded by the attempt timeout
    async fn attempt(
        &self,
        provider: &dyn LlmProvider,
        api_key: &str,
        request: &PromptRequest,
    ) -> LlmResult<String> {
        let call = provider.complete(api_key, request);
        match self.options.attempt_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                LlmError::TimeoutError(format!("{} did not answer within {:?}", provider.name(), limit))
            })?,
            None => call.await,
        }
    }

    fn fallback(&self, agent: &Agent) -> GeneratedResponse {
        let text = fallback::fallback_reply(agent, &mut rand::thread_rng());
        local_response(text, FALLBACK_PROVIDER)
    }
}

fn local_response(text: String, provider: &str) -> GeneratedResponse {
    GeneratedResponse {
        text,
        provider: provider.to_string(),
        model: TEMPLATE_MODEL.to_string(),
        timestamp: Utc::now(),
    }
}

/// System prompt describing the agent persona
pub fn persona_prompt(agent: &Agent) -> String {
    let mut prompt = format!("You are {}, a {} AI agent.", agent.name, agent.agent_type);
    if !agent.description.trim().is_empty() {
        prompt.push(' ');
        prompt.push_str(agent.description.trim());
    }
    if !agent.capabilities.is_empty() {
        prompt.push_str(&format!(
            " Your capabilities include: {}.",
            agent.capability_list()
        ));
    }
    prompt.push_str(" Stay in character and answer helpfully and concisely.");
    prompt
}
