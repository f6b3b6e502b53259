//! Session state machine, conversation logic and port traits for Urna.
//!
//! This crate defines the "ports" (store and client traits) that the
//! infrastructure layer implements, plus the logic built on them. It depends
//! only on `urna-types` -- never on `urna-infra` or any database/HTTP crate.

pub mod chat;
pub mod clock;
pub mod identity;
pub mod session;
pub mod storage;
