//! NeuralForge core
//!
//! Agent personas, a multi-provider response resolver with deterministic
//! local fallback, and key-value backed chat-session persistence.

pub mod agent;
pub mod app;
pub mod cli;
pub mod config;
pub mod llm;
pub mod session;
pub mod storage;
pub mod version;
