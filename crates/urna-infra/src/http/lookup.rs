//! HttpIdentityLookup -- concrete [`IdentityLookupClient`] over HTTP.
//!
//! `POST {lookup_url}` with `{"cedula": "..."}`. A 2xx JSON body is
//! classified into found / not found; everything else is a transport
//! failure reported as `LookupUnavailable`.

use serde::Serialize;
use tracing::{debug, warn};
use urna_core::identity::lookup::IdentityLookupClient;
use urna_types::error::LoginError;
use urna_types::identity::LookupOutcome;

use super::error_body;

#[derive(Debug, Serialize)]
struct LookupRequest<'a> {
    cedula: &'a str,
}

/// Identity lookup service client.
#[derive(Clone)]
pub struct HttpIdentityLookup {
    client: reqwest::Client,
    url: String,
}

impl HttpIdentityLookup {
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

impl IdentityLookupClient for HttpIdentityLookup {
    async fn lookup(&self, cedula: &str) -> Result<LookupOutcome, LoginError> {
        let response = self
            .client
            .post(&self.url)
            .json(&LookupRequest { cedula })
            .send()
            .await
            .map_err(|e| {
                warn!(url = %self.url, error = %e, "Identity lookup request failed");
                LoginError::LookupUnavailable(format!("HTTP request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let detail = error_body(response).await;
            warn!(url = %self.url, %detail, "Identity lookup rejected");
            return Err(LoginError::LookupUnavailable(detail));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            LoginError::LookupUnavailable(format!("failed to parse response: {e}"))
        })?;

        let outcome = LookupOutcome::classify(cedula, body);
        debug!(found = matches!(outcome, LookupOutcome::Found(_)), "Identity lookup completed");
        Ok(outcome)
    }
}
