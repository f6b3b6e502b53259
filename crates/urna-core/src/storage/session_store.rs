//! SessionStore trait and its key-value adapter.
//!
//! `KvSessionStore` maps a [`Session`] onto three persisted keys:
//! `chat_session_id`, `chat_user_data` (JSON) and `chat_login_time`
//! (epoch ms as text). It performs no policy beyond decoding; the
//! controller decides what a loaded session means.

use tracing::warn;
use urna_types::error::RepositoryError;
use urna_types::identity::SessionIdentity;
use urna_types::session::{LOGIN_TIME_KEY, Login, SESSION_ID_KEY, Session, USER_DATA_KEY};

use super::kv_store::KvStore;

/// Persistence port for the client session.
pub trait SessionStore: Send + Sync {
    /// Load the stored session. A missing record yields `Session::default()`.
    fn load(&self) -> impl std::future::Future<Output = Result<Session, RepositoryError>> + Send;

    /// Persist the session, replacing whatever was stored.
    fn save(
        &self,
        session: &Session,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove every persisted session key.
    fn clear(&self) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}

/// [`SessionStore`] over any [`KvStore`], bound to one scope.
pub struct KvSessionStore<K: KvStore> {
    kv: K,
    scope: String,
}

impl<K: KvStore> KvSessionStore<K> {
    pub fn new(kv: K, scope: impl Into<String>) -> Self {
        Self {
            kv,
            scope: scope.into(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }
}

/// Decode the persisted login pair.
fn decode_login(user_data: &str, login_time: &str) -> Result<Login, String> {
    let identity: SessionIdentity =
        serde_json::from_str(user_data).map_err(|e| format!("invalid user data: {e}"))?;
    let logged_in_at_ms = login_time
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid login time '{login_time}': {e}"))?;

    Ok(Login {
        identity,
        logged_in_at_ms,
    })
}

impl<K: KvStore> SessionStore for KvSessionStore<K> {
    async fn load(&self) -> Result<Session, RepositoryError> {
        let session_id = self
            .kv
            .get(&self.scope, SESSION_ID_KEY)
            .await?
            .unwrap_or_default();
        let user_data = self.kv.get(&self.scope, USER_DATA_KEY).await?;
        let login_time = self.kv.get(&self.scope, LOGIN_TIME_KEY).await?;

        // A half-written or undecodable pair is treated as "no login" so the
        // identity/timestamp pairing holds for every loaded session.
        let login = match (user_data, login_time) {
            (None, None) => None,
            (Some(user_data), Some(login_time)) => match decode_login(&user_data, &login_time) {
                Ok(login) => Some(login),
                Err(reason) => {
                    warn!(scope = %self.scope, %reason, "Ignoring undecodable stored login");
                    None
                }
            },
            _ => {
                warn!(scope = %self.scope, "Ignoring incomplete stored login");
                None
            }
        };

        Ok(Session { session_id, login })
    }

    /// The keys are written one by one, not atomically. A login is written
    /// as: drop the old login time, write the user data, write the new login
    /// time. An interrupted save therefore leaves either the previous login
    /// or an incomplete pair, which loads as no login; never the new
    /// identity with the old timestamp.
    async fn save(&self, session: &Session) -> Result<(), RepositoryError> {
        self.kv
            .set(&self.scope, SESSION_ID_KEY, &session.session_id)
            .await?;

        match &session.login {
            Some(login) => {
                let user_data = serde_json::to_string(&login.identity)
                    .map_err(|e| RepositoryError::Query(format!("failed to encode user data: {e}")))?;
                self.kv.delete(&self.scope, LOGIN_TIME_KEY).await?;
                self.kv.set(&self.scope, USER_DATA_KEY, &user_data).await?;
                self.kv
                    .set(
                        &self.scope,
                        LOGIN_TIME_KEY,
                        &login.logged_in_at_ms.to_string(),
                    )
                    .await?;
            }
            None => {
                self.kv.delete(&self.scope, USER_DATA_KEY).await?;
                self.kv.delete(&self.scope, LOGIN_TIME_KEY).await?;
            }
        }

        Ok(())
    }

    async fn clear(&self) -> Result<(), RepositoryError> {
        for key in [SESSION_ID_KEY, USER_DATA_KEY, LOGIN_TIME_KEY] {
            self.kv.delete(&self.scope, key).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use urna_types::identity::Identity;

    /// HashMap-backed KvStore for core tests.
    #[derive(Default)]
    pub(crate) struct MapKv {
        pub entries: Mutex<HashMap<(String, String), String>>,
    }

    impl MapKv {
        pub fn value(&self, scope: &str, key: &str) -> Option<String> {
            self.entries
                .lock()
                .unwrap()
                .get(&(scope.to_string(), key.to_string()))
                .cloned()
        }

        pub fn put(&self, scope: &str, key: &str, value: &str) {
            self.entries
                .lock()
                .unwrap()
                .insert((scope.to_string(), key.to_string()), value.to_string());
        }
    }

    impl KvStore for MapKv {
        async fn get(&self, scope: &str, key: &str) -> Result<Option<String>, RepositoryError> {
            Ok(self.value(scope, key))
        }

        async fn set(&self, scope: &str, key: &str, value: &str) -> Result<(), RepositoryError> {
            self.put(scope, key, value);
            Ok(())
        }

        async fn delete(&self, scope: &str, key: &str) -> Result<(), RepositoryError> {
            self.entries
                .lock()
                .unwrap()
                .remove(&(scope.to_string(), key.to_string()));
            Ok(())
        }
    }

    /// MapKv that starts failing writes once its budget is spent.
    #[derive(Default)]
    struct FlakyKv {
        inner: MapKv,
        writes_left: Mutex<Option<usize>>,
    }

    impl FlakyKv {
        fn fail_after(&self, writes: usize) {
            *self.writes_left.lock().unwrap() = Some(writes);
        }

        fn spend(&self) -> Result<(), RepositoryError> {
            let mut left = self.writes_left.lock().unwrap();
            match left.as_mut() {
                Some(0) => Err(RepositoryError::Connection),
                Some(n) => {
                    *n -= 1;
                    Ok(())
                }
                None => Ok(()),
            }
        }
    }

    impl KvStore for FlakyKv {
        async fn get(&self, scope: &str, key: &str) -> Result<Option<String>, RepositoryError> {
            self.inner.get(scope, key).await
        }

        async fn set(&self, scope: &str, key: &str, value: &str) -> Result<(), RepositoryError> {
            self.spend()?;
            self.inner.set(scope, key, value).await
        }

        async fn delete(&self, scope: &str, key: &str) -> Result<(), RepositoryError> {
            self.spend()?;
            self.inner.delete(scope, key).await
        }
    }

    const NOW: i64 = 1_767_225_600_000;

    #[tokio::test]
    async fn test_load_empty_store() {
        let store = KvSessionStore::new(MapKv::default(), "default");
        let session = store.load().await.unwrap();
        assert_eq!(session, Session::default());
    }

    #[tokio::test]
    async fn test_save_guest_layout() {
        let store = KvSessionStore::new(MapKv::default(), "default");
        let mut session = Session::new("abc");
        session.login_as_guest(NOW);
        store.save(&session).await.unwrap();

        let kv = store.kv();
        assert_eq!(kv.value("default", SESSION_ID_KEY).as_deref(), Some("abc"));
        assert_eq!(
            kv.value("default", USER_DATA_KEY).as_deref(),
            Some(r#"{"is_guest":true}"#)
        );
        assert_eq!(
            kv.value("default", LOGIN_TIME_KEY),
            Some(NOW.to_string())
        );

        assert_eq!(store.load().await.unwrap(), session);
    }

    #[tokio::test]
    async fn test_save_identified_layout() {
        let store = KvSessionStore::new(MapKv::default(), "default");
        let mut session = Session::new("anon");
        session.login_identified(Identity::new("206440798", json!({ "nombre": "ANA" })), NOW);
        store.save(&session).await.unwrap();

        let raw = store.kv().value("default", USER_DATA_KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, json!({ "cedula": "206440798", "tse_data": { "nombre": "ANA" } }));
        assert_eq!(store.kv().value("default", SESSION_ID_KEY).as_deref(), Some(""));

        assert_eq!(store.load().await.unwrap(), session);
    }

    #[tokio::test]
    async fn test_save_without_login_removes_pair() {
        let store = KvSessionStore::new(MapKv::default(), "default");
        let mut session = Session::new("abc");
        session.login_as_guest(NOW);
        store.save(&session).await.unwrap();

        session.login = None;
        store.save(&session).await.unwrap();
        assert!(store.kv().value("default", USER_DATA_KEY).is_none());
        assert!(store.kv().value("default", LOGIN_TIME_KEY).is_none());
        assert_eq!(store.kv().value("default", SESSION_ID_KEY).as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_incomplete_login_loads_as_none() {
        let kv = MapKv::default();
        kv.put("default", USER_DATA_KEY, r#"{"is_guest":true}"#);
        let store = KvSessionStore::new(kv, "default");
        assert!(store.load().await.unwrap().login.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_login_loads_as_none() {
        let kv = MapKv::default();
        kv.put("default", USER_DATA_KEY, r#"{"is_guest":true}"#);
        kv.put("default", LOGIN_TIME_KEY, "yesterday");
        let store = KvSessionStore::new(kv, "default");
        assert!(store.load().await.unwrap().login.is_none());

        store.kv().put("default", USER_DATA_KEY, "{not json");
        store.kv().put("default", LOGIN_TIME_KEY, &NOW.to_string());
        assert!(store.load().await.unwrap().login.is_none());
    }

    #[tokio::test]
    async fn test_scopes_are_isolated() {
        let store_a = KvSessionStore::new(MapKv::default(), "a");
        let mut session = Session::new("abc");
        session.login_as_guest(NOW);
        store_a.save(&session).await.unwrap();

        assert!(store_a.kv().value("b", SESSION_ID_KEY).is_none());
        assert_eq!(store_a.scope(), "a");
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let store = KvSessionStore::new(MapKv::default(), "default");
        let mut session = Session::new("abc");
        session.login_as_guest(NOW);
        store.save(&session).await.unwrap();

        store.clear().await.unwrap();
        assert!(store.kv().entries.lock().unwrap().is_empty());
        assert_eq!(store.load().await.unwrap(), Session::default());
    }

    #[tokio::test]
    async fn test_interrupted_save_never_mixes_logins() {
        let mut identified = Session::default();
        identified.login_identified(Identity::new("206440798", json!({ "nombre": "ANA" })), NOW);
        let mut guest = Session::default();
        guest.login_as_guest(NOW + 60_000);

        // A guest save performs four writes; fail at each one in turn.
        for budget in 0..4 {
            let store = KvSessionStore::new(FlakyKv::default(), "default");
            store.save(&identified).await.unwrap();
            store.kv().fail_after(budget);

            assert!(store.save(&guest).await.is_err());
            let loaded = store.load().await.unwrap();
            assert!(
                loaded.login.is_none() || loaded.login == identified.login,
                "write {budget} left a mixed login: {loaded:?}"
            );
        }
    }
}
