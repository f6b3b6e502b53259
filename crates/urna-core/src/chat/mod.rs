//! Chat exchange: the answering-service port, the conversation gate that
//! binds every turn to the session, and reply ordering.

pub mod client;
pub mod sequencer;
pub mod service;
