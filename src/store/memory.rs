//! In-process key-value store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KvStore, StoreError};

/// A [`KvStore`] held entirely in memory. Contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<(String, String), serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys across all groups.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, group: &str, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.get(&(group.to_string(), key.to_string())).cloned())
    }

    async fn set(
        &self,
        group: &str,
        key: &str,
        value: serde_json::Value,
    ) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        entries.insert((group.to_string(), key.to_string()), value);
        Ok(())
    }
}
