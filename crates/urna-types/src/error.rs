use thiserror::Error;

use crate::session::ReauthReason;

/// Errors from the persistence substrate (used by the store traits in urna-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),
}

/// Errors from `login_with_id`.
#[derive(Debug, Error)]
pub enum LoginError {
    /// No identifier was submitted. No network call was made.
    #[error("no identifier submitted")]
    EmptyInput,

    /// The lookup completed but matched nobody.
    #[error("identity not found")]
    IdentityNotFound,

    #[error("identity lookup unavailable: {0}")]
    LookupUnavailable(String),

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

/// Errors from the answering service round trip.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("answering service unavailable: {0}")]
    ChatUnavailable(String),
}

/// Errors from preparing or sending a chat turn.
#[derive(Debug, Error)]
pub enum SendError {
    /// The session gate refused the turn; the caller must log in again.
    #[error("re-authentication required: {0}")]
    ReauthRequired(ReauthReason),

    #[error("empty message")]
    EmptyUtterance,

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_display() {
        let err = LoginError::LookupUnavailable("HTTP 500".to_string());
        assert_eq!(err.to_string(), "identity lookup unavailable: HTTP 500");
        assert_eq!(LoginError::EmptyInput.to_string(), "no identifier submitted");
    }

    #[test]
    fn test_send_error_display() {
        let err = SendError::ReauthRequired(ReauthReason::Expired);
        assert_eq!(err.to_string(), "re-authentication required: session expired");

        let err: SendError = ChatError::ChatUnavailable("timeout".to_string()).into();
        assert_eq!(err.to_string(), "answering service unavailable: timeout");
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }
}
