//! Chat transcript types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Agent,
}

/// One transcript entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub agent_id: String,
}

impl Message {
    pub fn new(text: impl Into<String>, sender: Sender, agent_id: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
            agent_id: agent_id.into(),
        }
    }

    pub fn new_user(text: impl Into<String>, agent_id: impl Into<String>) -> Self {
        Self::new(text, Sender::User, agent_id)
    }

    pub fn new_agent(text: impl Into<String>, agent_id: impl Into<String>) -> Self {
        Self::new(text, Sender::Agent, agent_id)
    }
}

/// The persisted transcript for one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub agent_id: String,
    pub messages: Vec<Message>,
    pub last_updated: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(agent_id: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            agent_id: agent_id.into(),
            messages,
            last_updated: Utc::now(),
        }
    }

    /// Check a deserialized session before handing it out
    pub fn validate(&self) -> Result<(), String> {
        if self.agent_id.trim().is_empty() {
            return Err("session has no agentId".to_string());
        }
        if let Some(foreign) = self.messages.iter().find(|m| m.agent_id != self.agent_id) {
            return Err(format!(
                "message {} belongs to agent {}, not {}",
                foreign.id, foreign.agent_id, self.agent_id
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_wire_format() {
        let message = Message::new_user("hi", "a1");
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["sender"], "user");
        assert_eq!(json["agentId"], "a1");
        // ISO-8601 string in storage
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_validate_rejects_foreign_messages() {
        let session = ChatSession::new("a1", vec![Message::new_agent("hello", "a2")]);
        assert!(session.validate().is_err());

        let blank = ChatSession::new(" ", vec![]);
        assert!(blank.validate().is_err());

        let good = ChatSession::new("a1", vec![Message::new_agent("hello", "a1")]);
        assert!(good.validate().is_ok());
    }
}
