use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value as JsonValue;

use rightgate_engine::{SessionStore, SessionStoreError};

/// In-memory per-session key/value store.
///
/// One instance models one user session. Intended for tests/dev; a real
/// deployment backs this trait with its session middleware.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<String, JsonValue>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<JsonValue>, SessionStoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| SessionStoreError::unavailable("lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: JsonValue) -> Result<(), SessionStoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| SessionStoreError::unavailable("lock poisoned"))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), SessionStoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| SessionStoreError::unavailable("lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}
