//! Client configuration types for Urna.
//!
//! `ClientConfig` represents the top-level `config.toml` in the data
//! directory. Every section and field has a default, so an empty or missing
//! file yields a working configuration.

use serde::{Deserialize, Serialize};

use crate::session::SESSION_TTL_MS;

/// Top-level configuration for the Urna client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Where the lookup and answering endpoints live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_lookup_path")]
    pub lookup_path: String,
    #[serde(default = "default_chat_path")]
    pub chat_path: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_lookup_path() -> String {
    "/api/validate-cedula".to_string()
}

fn default_chat_path() -> String {
    "/api/chat".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            lookup_path: default_lookup_path(),
            chat_path: default_chat_path(),
        }
    }
}

impl ServiceConfig {
    pub fn lookup_url(&self) -> String {
        join_url(&self.base_url, &self.lookup_path)
    }

    pub fn chat_url(&self) -> String {
        join_url(&self.base_url, &self.chat_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Session lifetime and persistence scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Minutes a login stays valid. Values below 1 are clamped to 1.
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: u32,
    /// Key-value scope (one per origin / profile).
    #[serde(default = "default_scope")]
    pub scope: String,
}

fn default_ttl_minutes() -> u32 {
    (SESSION_TTL_MS / 60_000) as u32
}

fn default_scope() -> String {
    "default".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_ttl_minutes(),
            scope: default_scope(),
        }
    }
}

impl SessionConfig {
    pub fn ttl_ms(&self) -> i64 {
        i64::from(self.ttl_minutes.max(1)) * 60_000
    }
}

/// Order in which completed replies are handed to the view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyOrder {
    /// As each round trip finishes.
    #[default]
    Completion,
    /// In the order the turns were sent; early completions wait.
    Send,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub reply_order: ReplyOrder,
}
