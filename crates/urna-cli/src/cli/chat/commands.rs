//! Slash command parsing for the chat loop.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat.
    Exit,
    /// Show who the session belongs to.
    WhoAmI,
    /// Clear the session and ask for a new login.
    Logout,
    /// Continue as a guest.
    Guest,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .to_lowercase();

    match cmd.as_str() {
        "/help" | "/h" | "/?" | "/ayuda" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" | "/salir" => Some(ChatCommand::Exit),
        "/whoami" | "/yo" => Some(ChatCommand::WhoAmI),
        "/logout" => Some(ChatCommand::Logout),
        "/guest" | "/invitado" => Some(ChatCommand::Guest),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Help text listing all commands.
pub fn help_text() -> String {
    let rows = [
        ("/help", "Mostrar esta ayuda"),
        ("/whoami", "Ver los datos de la sesión"),
        ("/guest", "Continuar como invitado"),
        ("/logout", "Cerrar la sesión"),
        ("/clear", "Limpiar la pantalla"),
        ("/exit", "Salir del chat"),
    ];

    let mut out = format!("\n  {}\n\n", style("Comandos disponibles:").bold());
    for (name, description) in rows {
        out.push_str(&format!("  {}  {description}\n", style(format!("{name:<8}")).cyan()));
    }
    out.push_str(&format!(
        "\n  {}\n",
        style("Ctrl+D para salir. Puede enviar varias preguntas sin esperar.").dim()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
        assert_eq!(parse("/AYUDA"), Some(ChatCommand::Help));
    }

    #[test]
    fn test_parse_exit() {
        assert_eq!(parse("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/salir"), Some(ChatCommand::Exit));
        assert_eq!(parse("  /q  "), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_parse_session_commands() {
        assert_eq!(parse("/whoami"), Some(ChatCommand::WhoAmI));
        assert_eq!(parse("/logout"), Some(ChatCommand::Logout));
        assert_eq!(parse("/invitado"), Some(ChatCommand::Guest));
        assert_eq!(parse("/clear extra"), Some(ChatCommand::Clear));
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("¿dónde voto?"), None);
        assert_eq!(parse("206440798"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("/foo"), Some(ChatCommand::Unknown("/foo".to_string())));
    }

    #[test]
    fn test_help_lists_commands() {
        let help = help_text();
        for name in ["/help", "/whoami", "/guest", "/logout", "/clear", "/exit"] {
            assert!(help.contains(name));
        }
    }
}
