//! Urna chat client entry point.
//!
//! Binary name: `urna`
//!
//! Parses CLI arguments, initializes tracing, storage and services, then
//! dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::{AppState, StateOptions};
use urna_infra::config::ConfigOverrides;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    urna_observe::init_tracing(cli.log_filter(), cli.log_format, cli.otel)
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "urna", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(StateOptions {
        data_dir: cli.data_dir.clone(),
        overrides: ConfigOverrides {
            base_url: cli.base_url.clone(),
            scope: cli.scope.clone(),
        },
        ephemeral: cli.ephemeral,
    })
    .await?;

    let result = match cli.command {
        Commands::Login { cedula, guest } => {
            cli::login::login(&state, cedula, guest, cli.json, cli.quiet).await
        }
        Commands::Logout => cli::login::logout(&state, cli.json, cli.quiet).await,
        Commands::Status => cli::status::status(&state, cli.json).await,
        Commands::Ask { question } => {
            cli::ask::ask(&state, &question.join(" "), cli.json).await
        }
        Commands::Chat => cli::chat::loop_runner::run_chat_loop(&state).await,
        Commands::Completions { .. } => Ok(()),
    };

    urna_observe::shutdown_tracing();
    result
}
