//! Welcome banner display for chat sessions.

use console::style;

/// First eight characters of a session id, for display.
fn short_id(session_id: &str) -> String {
    session_id.chars().take(8).collect()
}

/// Print the banner shown when `urna chat` starts.
pub fn print_welcome_banner(base_url: &str, session_id: &str) {
    println!();
    println!("  {} {}", style("*").cyan().bold(), style("Urna").cyan().bold());
    println!(
        "  {}",
        style("Asistente de información electoral").dim()
    );
    println!();
    println!("  {}  {}", style("Servicio:").bold(), style(base_url).dim());
    if !session_id.is_empty() {
        println!(
            "  {}    {}",
            style("Sesión:").bold(),
            style(short_id(session_id)).dim()
        );
    }
    println!();
    println!(
        "  {}",
        style("Escriba /help para ver los comandos, Ctrl+D para salir").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0199a1b2-c3d4-7e5f"), "0199a1b2");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("sesión-ñandú-01"), "sesión-ñ");
    }
}
