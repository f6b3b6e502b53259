//! CLI command definitions for the `urna` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod ask;
pub mod chat;
pub mod login;
pub mod messages;
pub mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use urna_observe::LogFormat;

/// Session-gated chat client for the voter information assistant.
#[derive(Parser)]
#[command(name = "urna", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding config.toml and the session database.
    #[arg(long, env = "URNA_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Base URL of the lookup and answering services.
    #[arg(long, env = "URNA_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Session storage scope.
    #[arg(long, global = true)]
    pub scope: Option<String>,

    /// Keep the session in memory only; nothing is written to disk.
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Log line format on stderr (text or json).
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LogFormat,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with a cédula or as a guest.
    Login {
        /// Cédula to look up.
        #[arg(long, conflicts_with = "guest")]
        cedula: Option<String>,

        /// Continue without identifying.
        #[arg(long)]
        guest: bool,
    },

    /// Clear the stored session.
    Logout,

    /// Show the current session.
    Status,

    /// Send one question and print the answer.
    Ask {
        /// Question text.
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Start an interactive chat.
    Chat,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

impl Cli {
    /// Default log directive for the verbosity flags.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn",
            1 => "info,urna_core=debug,urna_infra=debug",
            _ => "trace",
        }
    }
}
