//! Session types: the persisted unit binding a client episode to an identity.
//!
//! A [`Session`] is a plain value. Its transition methods are pure; loading
//! and saving it is the job of the session store in `urna-core`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::{Identity, IdentitySummary, SessionIdentity};

/// Fixed session lifetime measured from login (30 minutes).
pub const SESSION_TTL_MS: i64 = 30 * 60 * 1000;

/// Persisted key holding the session identifier.
pub const SESSION_ID_KEY: &str = "chat_session_id";
/// Persisted key holding the JSON-encoded identity payload.
pub const USER_DATA_KEY: &str = "chat_user_data";
/// Persisted key holding the login time in epoch milliseconds.
pub const LOGIN_TIME_KEY: &str = "chat_login_time";

/// Identity and login time, always set together.
#[derive(Debug, Clone, PartialEq)]
pub struct Login {
    pub identity: SessionIdentity,
    pub logged_in_at_ms: i64,
}

/// The client session.
///
/// An empty `session_id` means no identifier has been minted yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub session_id: String,
    pub login: Option<Login>,
}

/// Evaluated state of a session at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NoSession,
    GuestActive,
    IdentifiedActive,
    Expired,
}

impl SessionState {
    pub fn is_active(self) -> bool {
        matches!(self, SessionState::GuestActive | SessionState::IdentifiedActive)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::NoSession => write!(f, "no_session"),
            SessionState::GuestActive => write!(f, "guest_active"),
            SessionState::IdentifiedActive => write!(f, "identified_active"),
            SessionState::Expired => write!(f, "expired"),
        }
    }
}

/// Why the gate refused a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReauthReason {
    /// Nobody has logged in (or the user logged out).
    NoSession,
    /// A login existed but outlived the TTL; it has been cleared.
    Expired,
}

impl fmt::Display for ReauthReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReauthReason::NoSession => write!(f, "login required"),
            ReauthReason::Expired => write!(f, "session expired"),
        }
    }
}

/// Result of the per-turn session gate.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCheck {
    /// The session may send. `summary` is `None` for guests.
    Active {
        state: SessionState,
        summary: Option<IdentitySummary>,
    },
    /// The caller must run a login before sending.
    ReauthRequired(ReauthReason),
}

impl SessionCheck {
    pub fn is_active(&self) -> bool {
        matches!(self, SessionCheck::Active { .. })
    }
}

impl Session {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            login: None,
        }
    }

    pub fn identity(&self) -> Option<&SessionIdentity> {
        self.login.as_ref().map(|login| &login.identity)
    }

    pub fn login_timestamp(&self) -> Option<i64> {
        self.login.as_ref().map(|login| login.logged_in_at_ms)
    }

    /// Login time as a UTC timestamp, for display.
    pub fn login_time(&self) -> Option<DateTime<Utc>> {
        self.login_timestamp()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
    }

    pub fn has_session_id(&self) -> bool {
        !self.session_id.is_empty()
    }

    /// Evaluate the state at `now_ms`. Expiry is a hard cutoff at `ttl_ms`.
    pub fn state_at(&self, now_ms: i64, ttl_ms: i64) -> SessionState {
        match &self.login {
            None => SessionState::NoSession,
            Some(login) if now_ms - login.logged_in_at_ms >= ttl_ms => SessionState::Expired,
            Some(Login {
                identity: SessionIdentity::Guest,
                ..
            }) => SessionState::GuestActive,
            Some(_) => SessionState::IdentifiedActive,
        }
    }

    /// Milliseconds left before expiry, or `None` without an active login.
    pub fn remaining_ms(&self, now_ms: i64, ttl_ms: i64) -> Option<i64> {
        let login = self.login.as_ref()?;
        let remaining = ttl_ms - (now_ms - login.logged_in_at_ms);
        (remaining > 0).then_some(remaining)
    }

    /// Drop the login and the session id (`*Active -> Expired -> NoSession`).
    pub fn expire(&mut self) {
        self.login = None;
        self.session_id.clear();
    }

    /// Attach the guest marker. The session id is kept; callers replacing
    /// an identified login call [`Session::expire`] first.
    pub fn login_as_guest(&mut self, now_ms: i64) {
        self.login = Some(Login {
            identity: SessionIdentity::Guest,
            logged_in_at_ms: now_ms,
        });
    }

    /// Attach a resolved identity and reset the session id so the next turn
    /// is bound to a fresh conversation.
    pub fn login_identified(&mut self, identity: Identity, now_ms: i64) {
        self.login = Some(Login {
            identity: SessionIdentity::Identified(identity),
            logged_in_at_ms: now_ms,
        });
        self.session_id.clear();
    }
}
