//! Session status command.

use std::time::Duration;

use anyhow::Result;
use console::style;

use urna_types::session::SessionState;

use crate::state::AppState;

/// Render a remaining TTL as `MMm SSs`.
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{}m {:02}s", secs / 60, secs % 60)
}

fn state_label(state: SessionState) -> console::StyledObject<&'static str> {
    match state {
        SessionState::NoSession => style("sin sesión").dim(),
        SessionState::GuestActive => style("invitado").green(),
        SessionState::IdentifiedActive => style("identificado").green(),
        SessionState::Expired => style("expirada").yellow(),
    }
}

/// Show state, session id, identity summary and TTL remaining.
///
/// Read-only: an expired login is reported but not cleared.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let controller = state.controller();
    let current = controller.state().await?;
    let session = controller.session().await?;
    let remaining = controller.ttl_remaining().await?;
    let summary = session.identity().and_then(|identity| identity.summary());

    if json {
        let out = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "state": current,
            "session_id": (!session.session_id.is_empty()).then_some(&session.session_id),
            "logged_in_at": session.login_time().map(|t| t.to_rfc3339()),
            "ttl_remaining_secs": remaining.map(|d| d.as_secs()),
            "identity": summary,
            "base_url": state.config.service.base_url,
            "scope": state.config.session.scope,
            "data_dir": state.data_dir.display().to_string(),
            "ephemeral": state.ephemeral,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Urna v{}",
        style("*").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("  {}", style("── Sesión ──").dim());
    println!("  Estado:     {}", state_label(current));
    if session.has_session_id() {
        println!("  ID:         {}", style(&session.session_id).dim());
    }
    if let Some(login_time) = session.login_time() {
        println!(
            "  Ingreso:    {}",
            login_time.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    if let Some(remaining) = remaining {
        println!("  Restante:   {}", style(format_remaining(remaining)).bold());
    }
    println!();

    if let Some(summary) = summary {
        println!("  {}", style("── Votante ──").dim());
        for line in summary.to_string().lines() {
            println!("  {line}");
        }
        println!();
    }

    println!("  {}", style("── Servicio ──").dim());
    println!("  URL:        {}", state.config.service.base_url);
    println!("  Alcance:    {}", state.config.session.scope);
    if state.ephemeral {
        println!("  Datos:      {}", style("solo en memoria").yellow());
    } else {
        println!("  Datos:      {}", state.data_dir.display());
    }
    println!();

    Ok(())
}
