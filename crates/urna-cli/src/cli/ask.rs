//! One-shot question command.

use anyhow::Result;
use console::style;

use urna_types::error::SendError;

use super::chat::renderer::ChatRenderer;
use super::messages;
use crate::state::AppState;

/// Send one gated turn and print the answer.
///
/// Exits non-zero when the session needs a new login.
pub async fn ask(state: &AppState, question: &str, json: bool) -> Result<()> {
    match state.conversation.send_message(question).await {
        Ok(reply) => {
            if json {
                let out = serde_json::json!({ "seq": reply.seq, "answer": reply.answer });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                let renderer = ChatRenderer::new();
                println!("{}", renderer.render(&reply.answer).trim_end());
            }
            Ok(())
        }
        Err(SendError::ReauthRequired(reason)) => {
            eprintln!(
                "  {} {}",
                style("!").yellow().bold(),
                messages::reauth(reason)
            );
            Err(anyhow::anyhow!("re-authentication required ({reason}); run `urna login`"))
        }
        Err(e) => Err(anyhow::anyhow!(messages::send_error(&e))),
    }
}
