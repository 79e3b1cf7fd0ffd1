//! Anthropic provider implementation

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use serde::{Deserialize, Serialize};

use crate::llm::{
    errors::LlmResult,
    provider::{utils, LlmProvider, ProviderClientOptions},
    types::{PromptRequest, ProviderConfig},
};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic messages API provider
#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    client: Client,
    config: ProviderConfig,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider
    pub fn new(config: ProviderConfig, options: &ProviderClientOptions) -> LlmResult<Self> {
        Ok(Self::with_client(config, options.build_client()?))
    }

    /// Create a provider around an existing HTTP client
    pub fn with_client(config: ProviderConfig, client: Client) -> Self {
        Self { client, config }
    }

    fn build_body(&self, request: &PromptRequest) -> AnthropicRequest {
        AnthropicRequest {
            model: self.config.primary_model().to_string(),
            max_tokens: request.max_tokens,
            system: Some(request.system.clone()).filter(|s| !s.is_empty()),
            temperature: request.temperature,
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: request.message.clone(),
            }],
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn complete(&self, api_key: &str, request: &PromptRequest) -> LlmResult<String> {
        let http_request = self
            .client
            .post(&self.config.endpoint)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header(CONTENT_TYPE, "application/json")
            .json(&self.build_body(request));

        let response: AnthropicResponse = utils::send_json(http_request).await?;
        utils::non_empty(&self.config.name, response.text())
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

// Anthropic API types
#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicResponse {
    fn text(self) -> String {
        self.content
            .into_iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("")
    }
}
