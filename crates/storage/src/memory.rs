//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use super::{validate_key, KeyValueStore, Result};

/// Process-local key-value store.
///
/// Clones share the same underlying map, so a clone handed to one store
/// instance observes writes made through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    /// Remove a key. Returns whether it was present.
    pub async fn remove(&self, key: &str) -> bool {
        self.entries.lock().await.remove(key).is_some()
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether no keys are stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        validate_key(key)?;
        self.entries.lock().await.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
