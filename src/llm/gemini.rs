//! Gemini provider implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::llm::{
    errors::LlmResult,
    provider::{utils, LlmProvider, ProviderClientOptions},
    types::{PromptRequest, ProviderConfig},
};

/// Gemini generateContent provider
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: Client,
    config: ProviderConfig,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    pub fn new(config: ProviderConfig, options: &ProviderClientOptions) -> LlmResult<Self> {
        Ok(Self::with_client(config, options.build_client()?))
    }

    /// Create a provider around an existing HTTP client
    pub fn with_client(config: ProviderConfig, client: Client) -> Self {
        Self { client, config }
    }

    fn get_endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.primary_model()
        )
    }

    fn build_body(&self, request: &PromptRequest) -> GenerateContentRequest {
        let system_instruction = Some(request.system.as_str())
            .filter(|s| !s.is_empty())
            .map(|text| Content {
                role: None,
                parts: vec![Part {
                    text: Some(text.to_string()),
                }],
            });

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(request.message.clone()),
                }],
            }],
            system_instruction,
            generation_config: GenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            },
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn complete(&self, api_key: &str, request: &PromptRequest) -> LlmResult<String> {
        let http_request = self
            .client
            .post(self.get_endpoint())
            .header("x-goog-api-key", api_key)
            .json(&self.build_body(request));

        let response: GenerateContentResponse = utils::send_json(http_request).await?;
        utils::non_empty(&self.config.name, response.text())
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

// Gemini API types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{test_support, types::default_providers, LlmError};

    fn provider(endpoint: String) -> GeminiProvider {
        let mut config = default_providers().remove(2);
        config.endpoint = endpoint;
        GeminiProvider::with_client(config, test_support::client())
    }

    #[test]
    fn test_endpoint_includes_model() {
        let provider = provider("https://example.test/v1beta/models/".to_string());
        assert_eq!(
            provider.get_endpoint(),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_body_uses_camel_case() {
        let body = provider("http://unused".to_string()).build_body(&test_support::prompt("hi"));
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 256);
        assert!(json["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Bot"));
    }

    #[tokio::test]
    async fn test_complete_against_local_server() {
        let server = test_support::MockServer::start(
            200,
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"o"},{"text":"k"}]}}]}"#,
        )
        .await;

        let text = provider(server.url())
            .complete("g-key", &test_support::prompt("hi"))
            .await
            .unwrap();

        assert_eq!(text, "ok");
        let request = server.last_request().unwrap();
        assert!(request.starts_with("POST /gemini-1.5-flash:generateContent"));
        assert!(request.to_lowercase().contains("x-goog-api-key: g-key"));
    }

    #[tokio::test]
    async fn test_no_candidates_is_failure() {
        let server = test_support::MockServer::start(200, r#"{"candidates":[]}"#).await;

        let result = provider(server.url())
            .complete("g-key", &test_support::prompt("hi"))
            .await;

        assert!(matches!(result, Err(LlmError::EmptyResponse(_))));
    }
}
