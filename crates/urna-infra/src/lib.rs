//! Infrastructure layer for Urna.
//!
//! Contains implementations of the port traits defined in `urna-core`:
//! SQLite and in-memory key-value substrates, the reqwest-based lookup and
//! answering clients, plus configuration loading and data directory layout.

pub mod backend;
pub mod config;
pub mod filesystem;
pub mod http;
pub mod memory;
pub mod sqlite;
