//! Chat session persistence
//!
//! All sessions live in one JSON list under the `chat_sessions` key. Reads
//! degrade to "no sessions" and writes are logged rather than propagated, so
//! a broken store resets the conversation instead of stopping it.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::session::chat::ChatSession;
use crate::storage::{KeyValueStore, StorageError, StorageResult, SESSIONS_KEY};

/// Replace-by-agent-id facade over the key-value store
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Insert or replace the session for `session.agent_id`. Failures are logged.
    pub fn save(&self, session: &ChatSession) {
        if let Err(e) = self.try_save(session) {
            warn!("Failed to save chat session for {}: {}", session.agent_id, e);
        }
    }

    /// `save`, reporting the storage outcome
    pub fn try_save(&self, session: &ChatSession) -> StorageResult<()> {
        let mut sessions = self.load_all();
        match sessions.iter_mut().find(|s| s.agent_id == session.agent_id) {
            Some(existing) => *existing = session.clone(),
            None => sessions.push(session.clone()),
        }
        self.write_all(&sessions)?;

        debug!(
            "Saved session for {} ({} messages)",
            session.agent_id,
            session.messages.len()
        );
        Ok(())
    }

    /// The session for `agent_id`, if one is stored and readable
    pub fn load(&self, agent_id: &str) -> Option<ChatSession> {
        self.load_all().into_iter().find(|s| s.agent_id == agent_id)
    }

    /// Every stored session; empty on missing, unreadable or malformed data
    pub fn load_all(&self) -> Vec<ChatSession> {
        let raw = match self.store.get(SESSIONS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read chat sessions: {}", e);
                return Vec::new();
            }
        };

        parse_sessions(&raw).unwrap_or_default()
    }

    /// Drop the stored transcript for `agent_id`. Failures are logged.
    pub fn remove(&self, agent_id: &str) {
        let mut sessions = self.load_all();
        let before = sessions.len();
        sessions.retain(|s| s.agent_id != agent_id);
        if sessions.len() == before {
            return;
        }

        if let Err(e) = self.write_all(&sessions) {
            warn!("Failed to remove chat session for {}: {}", agent_id, e);
        }
    }

    fn write_all(&self, sessions: &[ChatSession]) -> StorageResult<()> {
        let raw = serde_json::to_string(sessions)
            .map_err(|e| StorageError::WriteFailed(format!("serialize sessions: {}", e)))?;
        self.store.set(SESSIONS_KEY, &raw)
    }
}

/// Decode the stored list. `None` when the blob is not a JSON list;
/// entries that fail to decode or validate are dropped one by one.
fn parse_sessions(raw: &str) -> Option<Vec<ChatSession>> {
    let entries: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Stored chat sessions are malformed: {}", e);
            return None;
        }
    };

    let mut valid: Vec<ChatSession> = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let session: ChatSession = match serde_json::from_value(entry) {
            Ok(session) => session,
            Err(e) => {
                warn!("Dropping unreadable chat session at index {}: {}", index, e);
                continue;
            }
        };
        if let Err(reason) = session.validate() {
            warn!("Dropping stored chat session: {}", reason);
            continue;
        }
        // First occurrence wins if an older writer left duplicates behind
        if valid.iter().any(|s| s.agent_id == session.agent_id) {
            warn!("Dropping duplicate chat session for {}", session.agent_id);
            continue;
        }
        valid.push(session);
    }
    Some(valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::chat::Message;
    use crate::storage::{MemoryStore, UnreadableStore};

    /// Store whose writes always fail
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.0.get(key)
        }

        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::WriteFailed("quota exceeded".to_string()))
        }

        fn remove(&self, _key: &str) -> StorageResult<()> {
            Err(StorageError::WriteFailed("quota exceeded".to_string()))
        }
    }

    fn store() -> (Arc<MemoryStore>, SessionStore) {
        let backing = Arc::new(MemoryStore::new());
        let sessions = SessionStore::new(backing.clone());
        (backing, sessions)
    }

    fn session(agent_id: &str, texts: &[&str]) -> ChatSession {
        let messages = texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                if i % 2 == 0 {
                    Message::new_user(*text, agent_id)
                } else {
                    Message::new_agent(*text, agent_id)
                }
            })
            .collect();
        ChatSession::new(agent_id, messages)
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let (_, sessions) = store();
        let saved = session("a1", &["hi", "hello there", "how are you?"]);

        sessions.save(&saved);
        let loaded = sessions.load("a1").unwrap();

        assert_eq!(loaded.messages, saved.messages);
        assert_eq!(loaded.messages[1].timestamp, saved.messages[1].timestamp);
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_second_save_overwrites() {
        let (_, sessions) = store();

        sessions.save(&session("a1", &["first"]));
        sessions.save(&session("a2", &["other"]));
        assert_eq!(sessions.load_all().len(), 2);

        let replacement = session("a1", &["second", "reply"]);
        sessions.save(&replacement);

        let all = sessions.load_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all.iter().filter(|s| s.agent_id == "a1").count(), 1);
        assert_eq!(sessions.load("a1").unwrap().messages, replacement.messages);
    }

    #[test]
    fn test_missing_session_is_none() {
        let (_, sessions) = store();
        assert!(sessions.load("a1").is_none());
        assert!(sessions.load_all().is_empty());
    }

    #[test]
    fn test_malformed_json_is_none() {
        let (backing, sessions) = store();
        backing.set(SESSIONS_KEY, "{\"agentId\": oops").unwrap();

        assert!(sessions.load("a1").is_none());
        assert!(sessions.load_all().is_empty());
    }

    #[test]
    fn test_wrong_shape_is_empty() {
        let (backing, sessions) = store();
        backing
            .set(SESSIONS_KEY, r#"[{"agentId":"a1","messages":"nope"}]"#)
            .unwrap();

        assert!(sessions.load_all().is_empty());

        backing.set(SESSIONS_KEY, r#"{"agentId":"a1"}"#).unwrap();
        assert!(sessions.load_all().is_empty());
    }

    #[test]
    fn test_bad_entry_does_not_hide_others() {
        let (backing, sessions) = store();
        sessions.save(&session("a1", &["hi", "hello"]));
        sessions.save(&session("a2", &["hey"]));

        let mut raw: serde_json::Value =
            serde_json::from_str(&backing.get(SESSIONS_KEY).unwrap().unwrap()).unwrap();
        raw[1]["messages"][0]["timestamp"] = serde_json::json!("last tuesday");
        backing.set(SESSIONS_KEY, &raw.to_string()).unwrap();

        assert_eq!(sessions.load("a1").unwrap().messages.len(), 2);
        assert!(sessions.load("a2").is_none());

        // Writing another session keeps the readable ones
        sessions.save(&session("a3", &["yo"]));
        let ids: Vec<String> = sessions.load_all().into_iter().map(|s| s.agent_id).collect();
        assert_eq!(ids, vec!["a1", "a3"]);
    }

    #[test]
    fn test_read_failure_degrades_to_empty() {
        let sessions = SessionStore::new(Arc::new(UnreadableStore));

        assert!(sessions.load("a1").is_none());
        assert!(sessions.load_all().is_empty());
        sessions.save(&session("a1", &["hi"]));
        sessions.remove("a1");
    }

    #[test]
    fn test_invalid_entries_are_dropped() {
        let (backing, sessions) = store();
        let good = session("a1", &["hi"]);
        let mut bad = session("a2", &["hi"]);
        bad.messages[0].agent_id = "someone-else".to_string();
        backing
            .set(SESSIONS_KEY, &serde_json::to_string(&vec![bad, good.clone()]).unwrap())
            .unwrap();

        assert_eq!(sessions.load_all(), vec![good]);
    }

    #[test]
    fn test_save_recovers_from_corrupt_data() {
        let (backing, sessions) = store();
        backing.set(SESSIONS_KEY, "garbage").unwrap();

        sessions.save(&session("a1", &["hi"]));
        assert_eq!(sessions.load_all().len(), 1);
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let sessions = SessionStore::new(Arc::new(ReadOnlyStore(MemoryStore::new())));
        let s = session("a1", &["hi"]);

        sessions.save(&s);
        assert!(sessions.try_save(&s).is_err());
        assert!(sessions.load("a1").is_none());
    }

    #[test]
    fn test_remove() {
        let (_, sessions) = store();
        sessions.save(&session("a1", &["hi"]));
        sessions.save(&session("a2", &["hi"]));

        sessions.remove("a1");
        sessions.remove("missing");

        assert!(sessions.load("a1").is_none());
        assert!(sessions.load("a2").is_some());
    }
}
