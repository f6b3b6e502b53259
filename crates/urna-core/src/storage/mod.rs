//! Storage abstractions for Urna.
//!
//! Defines the scoped key-value port and the session store built on it.
//! Substrate implementations live in urna-infra.

pub mod kv_store;
pub mod session_store;
