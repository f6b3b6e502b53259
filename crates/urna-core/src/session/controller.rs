//! Session controller: the login / expiry state machine.
//!
//! States: `NoSession`, `GuestActive`, `IdentifiedActive`, `Expired`.
//! The controller never caches state. Every operation loads the session from
//! the store, evaluates it against the clock, applies at most one transition
//! and saves the result. Expiry is therefore lazy: it is detected on the next
//! access, never pushed by a timer.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};
use urna_types::error::{LoginError, RepositoryError};
use urna_types::identity::{Identity, LookupOutcome, SessionIdentity};
use urna_types::session::{ReauthReason, SESSION_TTL_MS, Session, SessionCheck, SessionState};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::identity::lookup::IdentityLookupClient;
use crate::storage::session_store::SessionStore;

/// Drives session transitions over an injected store, lookup client and clock.
pub struct SessionController<S, L, C = SystemClock> {
    store: S,
    lookup: L,
    clock: C,
    ttl_ms: i64,
}

impl<S: SessionStore, L: IdentityLookupClient, C: Clock> SessionController<S, L, C> {
    /// Create a controller with the default 30 minute TTL.
    pub fn new(store: S, lookup: L, clock: C) -> Self {
        Self {
            store,
            lookup,
            clock,
            ttl_ms: SESSION_TTL_MS,
        }
    }

    /// Override the session TTL.
    pub fn with_ttl_ms(mut self, ttl_ms: i64) -> Self {
        self.ttl_ms = ttl_ms;
        self
    }

    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Start-up: evaluate the stored session and mint a session id if none
    /// exists yet. Does not expire anything; the first `check_session` does.
    pub async fn open(&self) -> Result<SessionState, RepositoryError> {
        let mut session = self.store.load().await?;
        let state = session.state_at(self.clock.now_ms(), self.ttl_ms);

        if !session.has_session_id() {
            session.session_id = mint_session_id();
            self.store.save(&session).await?;
            debug!(session_id = %session.session_id, "Minted session id");
        }

        debug!(state = %state, "Session opened");
        Ok(state)
    }

    /// Read-only state evaluation.
    pub async fn state(&self) -> Result<SessionState, RepositoryError> {
        let session = self.store.load().await?;
        Ok(session.state_at(self.clock.now_ms(), self.ttl_ms))
    }

    /// Snapshot of the stored session, for display.
    pub async fn session(&self) -> Result<Session, RepositoryError> {
        self.store.load().await
    }

    /// The gate every outgoing turn must pass.
    ///
    /// An expired login is cleared (identity, timestamp and session id) and
    /// reported as `ReauthRequired(Expired)`.
    pub async fn check_session(&self) -> Result<SessionCheck, RepositoryError> {
        let mut session = self.store.load().await?;

        match session.state_at(self.clock.now_ms(), self.ttl_ms) {
            SessionState::NoSession => Ok(SessionCheck::ReauthRequired(ReauthReason::NoSession)),
            SessionState::Expired => {
                let logged_in_at = session.login_timestamp();
                session.expire();
                self.store.save(&session).await?;
                info!(?logged_in_at, "Session expired, re-authentication required");
                Ok(SessionCheck::ReauthRequired(ReauthReason::Expired))
            }
            state => Ok(SessionCheck::Active {
                state,
                summary: session.identity().and_then(SessionIdentity::summary),
            }),
        }
    }

    /// Log in without identifying. Never calls the lookup service.
    ///
    /// The session id is kept when coming from `NoSession` or a guest login.
    /// An expired or identified login is cleared first, so the next turn
    /// mints a fresh id.
    pub async fn login_as_guest(&self) -> Result<(), RepositoryError> {
        let now = self.clock.now_ms();
        let mut session = self.store.load().await?;
        match session.state_at(now, self.ttl_ms) {
            SessionState::Expired => session.expire(),
            SessionState::IdentifiedActive => {
                // The identified conversation must not continue under a guest.
                session.expire();
                info!("Replacing identified login with guest login");
            }
            SessionState::NoSession | SessionState::GuestActive => {}
        }

        session.login_as_guest(now);
        self.store.save(&session).await?;
        info!("Guest login");
        Ok(())
    }

    /// Resolve a cédula and log in as that identity.
    ///
    /// The candidate is trimmed; an empty one fails with `EmptyInput` before
    /// any network call. On success the session id is reset so the next turn
    /// starts a fresh conversation. On `IdentityNotFound` or
    /// `LookupUnavailable` the stored session is left untouched.
    pub async fn login_with_id(&self, candidate: &str) -> Result<Identity, LoginError> {
        let cedula = candidate.trim();
        if cedula.is_empty() {
            return Err(LoginError::EmptyInput);
        }

        match self.lookup.lookup(cedula).await? {
            LookupOutcome::NotFound => {
                info!("Identity lookup found no match");
                Err(LoginError::IdentityNotFound)
            }
            LookupOutcome::Found(identity) => {
                let mut session = self.store.load().await?;
                session.login_identified(identity.clone(), self.clock.now_ms());
                self.store.save(&session).await?;
                info!("Identified login");
                Ok(identity)
            }
        }
    }

    /// The session id to bind the next turn to, minting one when empty.
    pub async fn session_id_for_turn(&self) -> Result<String, RepositoryError> {
        let mut session = self.store.load().await?;
        if !session.has_session_id() {
            session.session_id = mint_session_id();
            self.store.save(&session).await?;
            debug!(session_id = %session.session_id, "Minted session id");
        }
        Ok(session.session_id)
    }

    /// The stored `userData` object sent as `user_context`, if any.
    pub async fn identity_context(&self) -> Result<Option<Value>, RepositoryError> {
        let session = self.store.load().await?;
        Ok(session.identity().map(SessionIdentity::to_user_data))
    }

    /// Time left on the current login, `None` when not active.
    pub async fn ttl_remaining(&self) -> Result<Option<Duration>, RepositoryError> {
        let session = self.store.load().await?;
        Ok(session
            .remaining_ms(self.clock.now_ms(), self.ttl_ms)
            .map(|ms| Duration::from_millis(ms.unsigned_abs())))
    }

    /// Explicit logout: clear every persisted key.
    pub async fn logout(&self) -> Result<(), RepositoryError> {
        self.store.clear().await?;
        info!("Logged out, session cleared");
        Ok(())
    }
}

fn mint_session_id() -> String {
    Uuid::now_v7().to_string()
}
