//! Chat turn types.
//!
//! A [`ChatTurn`] is transient: it is built per user message, sent once, and
//! never persisted. The answering service correlates turns only through
//! `session_id`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One outgoing user utterance bound to its session context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Client-local, monotonically increasing send order. Not sent on the wire.
    pub seq: u64,
    pub utterance: String,
    pub session_id: String,
    /// The persisted `userData` object, or `None` when absent.
    pub identity_context: Option<Value>,
}

/// A reply handed back to the view, tagged with the turn it answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub seq: u64,
    /// Answer text, verbatim (Markdown).
    pub answer: String,
}
