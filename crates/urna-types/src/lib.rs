//! Shared domain types for Urna.
//!
//! This crate contains the domain types used across the Urna chat client:
//! Session, Identity, ChatTurn, client configuration, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, serde_json, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod identity;
pub mod session;
