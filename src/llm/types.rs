//! Core types for provider configuration and responses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wire schema spoken by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Anthropic,
    OpenAi,
    Gemini,
}

/// Static descriptor of a remote text-generation provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Name used for key lookup and response tagging
    pub name: String,
    pub kind: ProviderKind,
    pub endpoint: String,
    /// The first model is the one requested
    pub models: Vec<String>,
    /// Lower values are tried first
    pub priority: u32,
    /// Environment variable consulted when no key is stored
    #[serde(default)]
    pub env_var: Option<String>,
}

impl ProviderConfig {
    /// The model sent with requests and reported in responses
    pub fn primary_model(&self) -> &str {
        self.models.first().map(String::as_str).unwrap_or("")
    }
}

/// The providers compiled into the application, in priority order
pub fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig {
            name: "claude".to_string(),
            kind: ProviderKind::Anthropic,
            endpoint: "https://api.anthropic.com/v1/messages".to_string(),
            models: vec![
                "claude-3-5-sonnet-20241022".to_string(),
                "claude-3-haiku-20240307".to_string(),
            ],
            priority: 1,
            env_var: Some("ANTHROPIC_API_KEY".to_string()),
        },
        ProviderConfig {
            name: "openai".to_string(),
            kind: ProviderKind::OpenAi,
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            models: vec!["gpt-4o-mini".to_string(), "gpt-4o".to_string()],
            priority: 2,
            env_var: Some("OPENAI_API_KEY".to_string()),
        },
        ProviderConfig {
            name: "gemini".to_string(),
            kind: ProviderKind::Gemini,
            endpoint: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            models: vec!["gemini-1.5-flash".to_string()],
            priority: 3,
            env_var: Some("GEMINI_API_KEY".to_string()),
        },
    ]
}

/// A single prompt sent to a provider
#[derive(Debug, Clone)]
pub struct PromptRequest {
    pub system: String,
    pub message: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

/// Resolved answer handed back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedResponse {
    pub text: String,
    /// Winning provider name, or `fallback` / `greeting` for local text
    pub provider: String,
    pub model: String,
    pub timestamp: DateTime<Utc>,
}

impl GeneratedResponse {
    /// Whether the text came from a remote provider
    pub fn is_remote(&self) -> bool {
        self.provider != crate::llm::fallback::FALLBACK_PROVIDER
            && self.provider != crate::llm::fallback::GREETING_PROVIDER
    }
}
