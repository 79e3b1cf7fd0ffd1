//! Key-value storage
//!
//! The persistence layer is a flat string-to-string namespace, the same
//! shape as browser local storage. Sessions, agents and API keys are all
//! serialized into it under well-known keys.

mod memory;
mod sqlite;

pub use memory::*;
pub use sqlite::*;

use thiserror::Error;

/// Key holding the serialized agent list
pub const AGENTS_KEY: &str = "agents";

/// Key holding the serialized chat session list
pub const SESSIONS_KEY: &str = "chat_sessions";

/// Storage failures. Callers in the core recover from both kinds locally.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage read failed: {0}")]
    ReadFailed(String),

    #[error("Storage write failed: {0}")]
    WriteFailed(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Capability interface over a persistent string key-value store
pub trait KeyValueStore: Send + Sync {
    /// Read a value. A missing key is `Ok(None)`, not an error.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Insert or overwrite a value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete a value. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Store standing in for disabled storage: every operation fails
#[cfg(test)]
pub(crate) struct UnreadableStore;

#[cfg(test)]
impl KeyValueStore for UnreadableStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::ReadFailed(format!("{}: storage disabled", key)))
    }

    fn set(&self, key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::WriteFailed(format!("{}: storage disabled", key)))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        Err(StorageError::WriteFailed(format!("{}: storage disabled", key)))
    }
}
