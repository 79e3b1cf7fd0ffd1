//! LLM provider abstractions and the response resolver
//!
//! Remote providers (Anthropic, OpenAI, Gemini) each speak their own wire
//! schema behind the `LlmProvider` trait. `ProviderResolver` tries them in
//! priority order and falls back to local template text when none answers.

pub mod provider;
pub mod types;
pub mod openai;
pub mod anthropic;
pub mod gemini;
pub mod errors;
pub mod keys;
pub mod fallback;
pub mod resolver;

#[cfg(test)]
pub(crate) mod test_support;

pub use provider::*;
pub use types::*;
pub use errors::*;
pub use keys::*;
pub use resolver::*;
