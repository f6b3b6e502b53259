//! Login and logout commands.

use anyhow::Result;
use console::style;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};

use urna_types::error::LoginError;
use urna_types::identity::{Identity, IdentitySummary};

use super::messages;
use crate::state::AppState;

/// Look up `cedula` behind a spinner.
async fn verify(state: &AppState, cedula: &str) -> Result<Identity, LoginError> {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(messages::VERIFYING);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    let result = state.controller().login_with_id(cedula).await;
    spinner.finish_and_clear();
    result
}

/// Log in from flags, or interactively when neither flag is given.
///
/// ```bash
/// urna login --cedula 206440798
/// urna login --guest
/// urna login
/// ```
pub async fn login(
    state: &AppState,
    cedula: Option<String>,
    guest: bool,
    json: bool,
    quiet: bool,
) -> Result<()> {
    state.controller().open().await?;

    if guest {
        state.controller().login_as_guest().await?;
        return print_guest(json, quiet);
    }

    if let Some(cedula) = cedula {
        return match verify(state, &cedula).await {
            Ok(identity) => print_identified(&identity.summary(), json, quiet),
            Err(e) => Err(anyhow::anyhow!(messages::login_error(&e))),
        };
    }

    let choice = Select::new()
        .with_prompt("¿Cómo desea continuar?")
        .items(&["Ingresar con cédula", "Continuar como invitado"])
        .default(0)
        .interact()?;

    if choice == 1 {
        state.controller().login_as_guest().await?;
        return print_guest(json, quiet);
    }

    loop {
        let candidate: String = Input::new()
            .with_prompt("Cédula")
            .allow_empty(true)
            .interact_text()?;

        match verify(state, &candidate).await {
            Ok(identity) => return print_identified(&identity.summary(), json, quiet),
            Err(e @ (LoginError::EmptyInput | LoginError::IdentityNotFound)) => {
                eprintln!("  {} {}", style("!").yellow().bold(), messages::login_error(&e));
            }
            Err(e) => return Err(anyhow::anyhow!(messages::login_error(&e))),
        }
    }
}

fn print_guest(json: bool, quiet: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::json!({ "state": "guest_active" }));
    } else if !quiet {
        println!(
            "  {} Sesión iniciada como invitado.",
            style("✓").green().bold()
        );
    }
    Ok(())
}

fn print_identified(summary: &IdentitySummary, json: bool, quiet: bool) -> Result<()> {
    if json {
        let out = serde_json::json!({
            "state": "identified_active",
            "identity": summary,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if !quiet {
        println!();
        println!(
            "  {} Bienvenido, {}",
            style("✓").green().bold(),
            style(&summary.nombre).cyan().bold()
        );
        for line in summary.to_string().lines() {
            println!("  {}", style(line).dim());
        }
        println!();
    }
    Ok(())
}

/// Clear the stored session.
pub async fn logout(state: &AppState, json: bool, quiet: bool) -> Result<()> {
    state.controller().logout().await?;

    if json {
        println!("{}", serde_json::json!({ "logged_out": true }));
    } else if !quiet {
        println!("  {} Sesión cerrada.", style("✓").green().bold());
    }
    Ok(())
}
