//! HTTP clients for the two external contracts.
//!
//! Both are single JSON POST round trips over a shared `reqwest::Client`.
//! No retries and no timeout beyond the client's own defaults.

pub mod chat;
pub mod lookup;

pub use chat::HttpChatClient;
pub use lookup::HttpIdentityLookup;

/// Build the shared HTTP client.
pub fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(concat!("urna/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Read the body of a non-2xx response for diagnostics.
async fn error_body(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let body: String = body.chars().take(500).collect();
    format!("HTTP {status}: {body}")
}
