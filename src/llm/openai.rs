//! OpenAI provider implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::llm::{
    errors::LlmResult,
    provider::{utils, LlmProvider, ProviderClientOptions},
    types::{PromptRequest, ProviderConfig},
};

/// OpenAI chat-completions provider
#[derive(Debug, Clone)]
pub struct OpenAIProvider {
    client: Client,
    config: ProviderConfig,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider
    pub fn new(config: ProviderConfig, options: &ProviderClientOptions) -> LlmResult<Self> {
        Ok(Self::with_client(config, options.build_client()?))
    }

    /// Create a provider around an existing HTTP client
    pub fn with_client(config: ProviderConfig, client: Client) -> Self {
        Self { client, config }
    }

    /// Convert the prompt to OpenAI format
    fn build_body(&self, request: &PromptRequest) -> OpenAIRequest {
        let mut messages = Vec::with_capacity(2);
        if !request.system.is_empty() {
            messages.push(OpenAIMessage {
                role: "system".to_string(),
                content: request.system.clone(),
            });
        }
        messages.push(OpenAIMessage {
            role: "user".to_string(),
            content: request.message.clone(),
        });

        OpenAIRequest {
            model: self.config.primary_model().to_string(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    async fn complete(&self, api_key: &str, request: &PromptRequest) -> LlmResult<String> {
        let http_request = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&self.build_body(request));

        let response: OpenAIResponse = utils::send_json(http_request).await?;
        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        utils::non_empty(&self.config.name, text)
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

// OpenAI API types
#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    #[serde(default)]
    content: Option<String>,
}
