//! Conversation service binding chat turns to the session.
//!
//! `ConversationService` is the only path from user text to the answering
//! service: it runs the session gate, mints the session id when needed,
//! attaches the identity context, and numbers the turn. Preparing a turn is
//! where all session reads and writes happen; sending it touches only the
//! network, so several prepared turns can be in flight at once.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tracing::{info, warn};
use urna_types::chat::{ChatReply, ChatTurn};
use urna_types::error::SendError;
use urna_types::session::SessionCheck;

use crate::chat::client::ChatClient;
use crate::clock::{Clock, SystemClock};
use crate::identity::lookup::IdentityLookupClient;
use crate::session::controller::SessionController;
use crate::storage::session_store::SessionStore;

/// Orchestrates gated, session-bound chat turns.
pub struct ConversationService<S, L, Ch, C = SystemClock> {
    controller: SessionController<S, L, C>,
    client: Ch,
    next_seq: AtomicU64,
}

impl<S, L, Ch, C> ConversationService<S, L, Ch, C>
where
    S: SessionStore,
    L: IdentityLookupClient,
    Ch: ChatClient,
    C: Clock,
{
    pub fn new(controller: SessionController<S, L, C>, client: Ch) -> Self {
        Self {
            controller,
            client,
            next_seq: AtomicU64::new(0),
        }
    }

    /// Access the session controller (login, status, logout).
    pub fn controller(&self) -> &SessionController<S, L, C> {
        &self.controller
    }

    /// Gate and build a turn for `text`.
    ///
    /// The session check runs before the text is inspected, so an expired
    /// session is reported even for a blank message.
    pub async fn prepare_turn(&self, text: &str) -> Result<ChatTurn, SendError> {
        if let SessionCheck::ReauthRequired(reason) = self.controller.check_session().await? {
            return Err(SendError::ReauthRequired(reason));
        }

        let utterance = text.trim();
        if utterance.is_empty() {
            return Err(SendError::EmptyUtterance);
        }

        let session_id = self.controller.session_id_for_turn().await?;
        let identity_context = self.controller.identity_context().await?;
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);

        Ok(ChatTurn {
            seq,
            utterance: utterance.to_string(),
            session_id,
            identity_context,
        })
    }

    /// One round trip to the answering service. No retry.
    pub async fn send_turn(&self, turn: &ChatTurn) -> Result<ChatReply, SendError> {
        let started = Instant::now();

        match self.client.send(turn).await {
            Ok(answer) => {
                info!(
                    seq = turn.seq,
                    session_id = %turn.session_id,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Reply received"
                );
                Ok(ChatReply {
                    seq: turn.seq,
                    answer,
                })
            }
            Err(e) => {
                warn!(seq = turn.seq, session_id = %turn.session_id, error = %e, "Chat turn failed");
                Err(e.into())
            }
        }
    }

    /// Prepare and send in one step.
    pub async fn send_message(&self, text: &str) -> Result<ChatReply, SendError> {
        let turn = self.prepare_turn(text).await?;
        self.send_turn(&turn).await
    }
}
