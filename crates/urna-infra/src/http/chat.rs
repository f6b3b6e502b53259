//! HttpChatClient -- concrete [`ChatClient`] for the answering service.
//!
//! `POST {chat_url}` with `{"question", "session_id", "user_context"}`,
//! expecting `{"answer": "..."}`. An `output` field is accepted when
//! `answer` is absent.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use urna_core::chat::client::ChatClient;
use urna_types::chat::ChatTurn;
use urna_types::error::ChatError;

use super::error_body;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    question: &'a str,
    session_id: &'a str,
    user_context: Option<&'a Value>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    output: Option<String>,
}

/// Answering service client.
#[derive(Clone)]
pub struct HttpChatClient {
    client: reqwest::Client,
    url: String,
}

impl HttpChatClient {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ChatClient for HttpChatClient {
    async fn send(&self, turn: &ChatTurn) -> Result<String, ChatError> {
        let body = ChatRequest {
            question: &turn.utterance,
            session_id: &turn.session_id,
            user_context: turn.identity_context.as_ref(),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::ChatUnavailable(format!("HTTP request failed: {e}")))?;

        if !response.status().is_success() {
            let detail = error_body(response).await;
            warn!(url = %self.url, %detail, "Answering service rejected turn");
            return Err(ChatError::ChatUnavailable(detail));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ChatError::ChatUnavailable(format!("failed to parse response: {e}")))?;

        parsed
            .answer
            .or(parsed.output)
            .ok_or_else(|| ChatError::ChatUnavailable("response has no answer".to_string()))
    }
}
