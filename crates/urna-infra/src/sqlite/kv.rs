//! SQLite key-value store implementation.
//!
//! Implements `KvStore` from `urna-core` using sqlx with split read/write
//! pools. Rows live in `client_kv`, keyed by `(scope, key)`.

use chrono::Utc;
use sqlx::Row;
use urna_core::storage::kv_store::KvStore;
use urna_types::error::RepositoryError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `KvStore`.
#[derive(Clone)]
pub struct SqliteKvStore {
    pool: DatabasePool,
}

impl SqliteKvStore {
    /// Create a new KV store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn query_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => RepositoryError::Connection,
        other => RepositoryError::Query(other.to_string()),
    }
}

impl KvStore for SqliteKvStore {
    async fn get(&self, scope: &str, key: &str) -> Result<Option<String>, RepositoryError> {
        let row = sqlx::query("SELECT value FROM client_kv WHERE scope = ? AND key = ?")
            .bind(scope)
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let value: String = row.try_get("value").map_err(query_error)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, scope: &str, key: &str, value: &str) -> Result<(), RepositoryError> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO client_kv (scope, key, value, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT (scope, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(scope)
        .bind(key)
        .bind(value)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(())
    }

    async fn delete(&self, scope: &str, key: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM client_kv WHERE scope = ? AND key = ?")
            .bind(scope)
            .bind(key)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use urna_core::storage::session_store::{KvSessionStore, SessionStore};
    use urna_types::session::{LOGIN_TIME_KEY, SESSION_ID_KEY, Session, USER_DATA_KEY};

    async fn test_store() -> (TempDir, SqliteKvStore) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::open_in(dir.path()).await.unwrap();
        (dir, SqliteKvStore::new(pool))
    }

    #[tokio::test]
    async fn test_set_get() {
        let (_dir, store) = test_store().await;
        store.set("default", "chat_session_id", "abc").await.unwrap();

        let got = store.get("default", "chat_session_id").await.unwrap();
        assert_eq!(got.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_get_nonexistent_returns_none() {
        let (_dir, store) = test_store().await;
        assert!(store.get("default", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_upserts() {
        let (_dir, store) = test_store().await;
        store.set("default", "chat_login_time", "1").await.unwrap();
        store.set("default", "chat_login_time", "2").await.unwrap();

        let got = store.get("default", "chat_login_time").await.unwrap();
        assert_eq!(got.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_empty_value_is_stored() {
        let (_dir, store) = test_store().await;
        store.set("default", "chat_session_id", "").await.unwrap();
        let got = store.get("default", "chat_session_id").await.unwrap();
        assert_eq!(got.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_delete_and_noop_delete() {
        let (_dir, store) = test_store().await;
        store.set("default", "temp", "value").await.unwrap();
        store.delete("default", "temp").await.unwrap();
        assert!(store.get("default", "temp").await.unwrap().is_none());

        store.delete("default", "nope").await.unwrap();
    }

    #[tokio::test]
    async fn test_scopes_are_isolated() {
        let (_dir, store) = test_store().await;
        store.set("a", "k", "1").await.unwrap();
        store.set("b", "k", "2").await.unwrap();
        store.delete("a", "k").await.unwrap();

        assert!(store.get("a", "k").await.unwrap().is_none());
        assert_eq!(store.get("b", "k").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_session_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new("abc");
        session.login_as_guest(1_767_225_600_000);

        {
            let pool = DatabasePool::open_in(dir.path()).await.unwrap();
            let store = KvSessionStore::new(SqliteKvStore::new(pool), "default");
            store.save(&session).await.unwrap();
        }

        let pool = DatabasePool::open_in(dir.path()).await.unwrap();
        let kv = SqliteKvStore::new(pool);
        assert_eq!(
            kv.get("default", USER_DATA_KEY).await.unwrap().as_deref(),
            Some(r#"{"is_guest":true}"#)
        );
        assert_eq!(
            kv.get("default", LOGIN_TIME_KEY).await.unwrap().as_deref(),
            Some("1767225600000")
        );
        assert_eq!(
            kv.get("default", SESSION_ID_KEY).await.unwrap().as_deref(),
            Some("abc")
        );

        let store = KvSessionStore::new(kv, "default");
        assert_eq!(store.load().await.unwrap(), session);
    }
}
