//! Process-local key-value store.
//!
//! Backs `--ephemeral` runs: the session lives only as long as the process.

use std::sync::Arc;

use dashmap::DashMap;
use urna_core::storage::kv_store::KvStore;
use urna_types::error::RepositoryError;

/// In-memory implementation of `KvStore`. Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryKvStore {
    entries: Arc<DashMap<(String, String), String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryKvStore {
    async fn get(&self, scope: &str, key: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self
            .entries
            .get(&(scope.to_string(), key.to_string()))
            .map(|entry| entry.value().clone()))
    }

    async fn set(&self, scope: &str, key: &str, value: &str) -> Result<(), RepositoryError> {
        self.entries
            .insert((scope.to_string(), key.to_string()), value.to_string());
        Ok(())
    }

    async fn delete(&self, scope: &str, key: &str) -> Result<(), RepositoryError> {
        self.entries.remove(&(scope.to_string(), key.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let store = MemoryKvStore::new();
        assert!(store.is_empty());

        store.set("default", "k", "v").await.unwrap();
        assert_eq!(store.get("default", "k").await.unwrap().as_deref(), Some("v"));
        assert!(store.get("other", "k").await.unwrap().is_none());

        store.delete("default", "k").await.unwrap();
        assert!(store.get("default", "k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let store = MemoryKvStore::new();
        let clone = store.clone();
        clone.set("default", "k", "v").await.unwrap();
        assert_eq!(store.len(), 1);
    }
}
