//! Conversation flow: rehydrate, ask, append, persist

use anyhow::{anyhow, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    agent::Agent,
    llm::{GeneratedResponse, ProviderResolver},
    session::{ChatSession, Message, SessionStore},
};

/// A conversation with one agent
pub struct Conversation {
    agent: Agent,
    messages: Vec<Message>,
    sessions: Arc<SessionStore>,
    resolver: Arc<ProviderResolver>,
}

impl Conversation {
    /// Restore the agent's transcript, or start one with a greeting
    pub async fn open(
        agent: Agent,
        sessions: Arc<SessionStore>,
        resolver: Arc<ProviderResolver>,
    ) -> Self {
        let messages = match sessions.load(&agent.id) {
            Some(session) => {
                debug!(
                    "Restored {} messages for agent {}",
                    session.messages.len(),
                    agent.id
                );
                session.messages
            }
            None => Vec::new(),
        };

        let mut conversation = Self {
            agent,
            messages,
            sessions,
            resolver,
        };

        if conversation.messages.is_empty() {
            let greeting = conversation
                .resolver
                .generate("", &conversation.agent, true)
                .await;
            conversation
                .messages
                .push(Message::new_agent(greeting.text, conversation.agent.id.clone()));
            conversation.persist();
        }

        conversation
    }

    /// Send a user message and record the agent's reply
    pub async fn send(&mut self, text: &str) -> Result<GeneratedResponse> {
        let text = text.trim();
        if text.is_empty() {
            return Err(anyhow!("Message is empty"));
        }

        self.messages
            .push(Message::new_user(text, self.agent.id.clone()));

        let response = self.resolver.generate(text, &self.agent, false).await;
        self.messages
            .push(Message::new_agent(response.text.clone(), self.agent.id.clone()));
        self.persist();

        info!(
            "Agent {} answered via {} ({})",
            self.agent.id, response.provider, response.model
        );
        Ok(response)
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// The transcript in insertion order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    fn persist(&self) {
        self.sessions
            .save(&ChatSession::new(self.agent.id.clone(), self.messages.clone()));
    }
}
