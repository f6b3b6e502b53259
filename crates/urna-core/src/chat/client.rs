//! ChatClient trait definition.

use urna_types::chat::ChatTurn;
use urna_types::error::ChatError;

/// Trait for the answering service.
///
/// A single one-shot request per turn: no retry, no queueing. Overlapping
/// calls are independent. Implementations live in urna-infra.
pub trait ChatClient: Send + Sync {
    /// Send one turn and return the answer text verbatim.
    fn send(
        &self,
        turn: &ChatTurn,
    ) -> impl std::future::Future<Output = Result<String, ChatError>> + Send;
}
