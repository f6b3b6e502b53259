//! Runtime choice between the durable and the process-local substrate.

use urna_core::storage::kv_store::KvStore;
use urna_types::error::RepositoryError;

use crate::memory::MemoryKvStore;
use crate::sqlite::kv::SqliteKvStore;

/// A [`KvStore`] picked at start-up.
#[derive(Clone)]
pub enum ClientKvStore {
    Sqlite(SqliteKvStore),
    Memory(MemoryKvStore),
}

impl ClientKvStore {
    pub fn is_durable(&self) -> bool {
        matches!(self, ClientKvStore::Sqlite(_))
    }
}

impl KvStore for ClientKvStore {
    async fn get(&self, scope: &str, key: &str) -> Result<Option<String>, RepositoryError> {
        match self {
            ClientKvStore::Sqlite(store) => store.get(scope, key).await,
            ClientKvStore::Memory(store) => store.get(scope, key).await,
        }
    }

    async fn set(&self, scope: &str, key: &str, value: &str) -> Result<(), RepositoryError> {
        match self {
            ClientKvStore::Sqlite(store) => store.set(scope, key, value).await,
            ClientKvStore::Memory(store) => store.set(scope, key, value).await,
        }
    }

    async fn delete(&self, scope: &str, key: &str) -> Result<(), RepositoryError> {
        match self {
            ClientKvStore::Sqlite(store) => store.delete(scope, key).await,
            ClientKvStore::Memory(store) => store.delete(scope, key).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::DatabasePool;

    #[tokio::test]
    async fn test_memory_variant_delegates() {
        let store = ClientKvStore::Memory(MemoryKvStore::new());
        assert!(!store.is_durable());
        store.set("default", "k", "v").await.unwrap();
        assert_eq!(store.get("default", "k").await.unwrap().as_deref(), Some("v"));
        store.delete("default", "k").await.unwrap();
        assert!(store.get("default", "k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sqlite_variant_delegates() {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::open_in(dir.path()).await.unwrap();
        let store = ClientKvStore::Sqlite(SqliteKvStore::new(pool));
        assert!(store.is_durable());
        store.set("default", "k", "v").await.unwrap();
        assert_eq!(store.get("default", "k").await.unwrap().as_deref(), Some("v"));
    }
}
