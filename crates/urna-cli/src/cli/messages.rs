//! User-facing text for login and send failures.

use urna_types::error::{LoginError, RepositoryError, SendError};
use urna_types::session::ReauthReason;

pub const ENTER_ID: &str = "Por favor ingrese su cédula.";
pub const ID_NOT_FOUND: &str = "Cédula no encontrada.";
pub const CONNECTION_ERROR: &str = "Error de conexión.";
pub const SERVER_ERROR: &str = "Error al conectar con el servidor.";
pub const VERIFYING: &str = "Verificando...";

/// Message shown for a failed login attempt.
pub fn login_error(err: &LoginError) -> String {
    match err {
        LoginError::EmptyInput => ENTER_ID.to_string(),
        LoginError::IdentityNotFound => ID_NOT_FOUND.to_string(),
        LoginError::LookupUnavailable(_) => CONNECTION_ERROR.to_string(),
        LoginError::Storage(e) => format!("Error al guardar la sesión: {e}"),
    }
}

/// Message shown when a session command could not read or write the store.
pub fn storage_error(err: &RepositoryError) -> String {
    format!("Error al acceder a la sesión: {err}")
}

/// Message shown when the session gate asks for a new login.
pub fn reauth(reason: ReauthReason) -> &'static str {
    match reason {
        ReauthReason::NoSession => "Inicie sesión para continuar.",
        ReauthReason::Expired => "Su sesión expiró. Inicie sesión nuevamente.",
    }
}

/// Message shown for a turn that produced no answer.
pub fn send_error(err: &SendError) -> String {
    match err {
        SendError::ReauthRequired(reason) => reauth(*reason).to_string(),
        SendError::EmptyUtterance => "Escriba un mensaje.".to_string(),
        SendError::Chat(_) => SERVER_ERROR.to_string(),
        SendError::Storage(e) => format!("Error al leer la sesión: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use urna_types::error::ChatError;

    #[test]
    fn test_login_error_text() {
        assert_eq!(login_error(&LoginError::EmptyInput), "Por favor ingrese su cédula.");
        assert_eq!(login_error(&LoginError::IdentityNotFound), "Cédula no encontrada.");
        assert_eq!(
            login_error(&LoginError::LookupUnavailable("HTTP 500".into())),
            "Error de conexión."
        );
        assert!(login_error(&LoginError::Storage(RepositoryError::Connection)).starts_with("Error"));
    }

    #[test]
    fn test_storage_error_text() {
        let err = RepositoryError::Query("database is locked".into());
        assert_eq!(
            storage_error(&err),
            "Error al acceder a la sesión: query error: database is locked"
        );
    }

    #[test]
    fn test_send_error_text() {
        let err = SendError::Chat(ChatError::ChatUnavailable("timeout".into()));
        assert_eq!(send_error(&err), "Error al conectar con el servidor.");
        assert_eq!(
            send_error(&SendError::ReauthRequired(ReauthReason::Expired)),
            reauth(ReauthReason::Expired)
        );
    }
}
