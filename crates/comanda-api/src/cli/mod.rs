//! CLI command definitions and dispatch for the `comanda` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod ask;
pub mod catalog;
pub mod chat;
pub mod config;

use std::time::Duration;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use indicatif::{ProgressBar, ProgressStyle};

use comanda_types::session::SessionKind;

/// Restaurant operations dashboard: assistant chat, analytics queries and
/// catalog views.
#[derive(Parser)]
#[command(name = "comanda", version, about, long_about = None)]
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

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true, env = "COMANDA_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to `server.port` in config.toml).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to `server.host` in config.toml).
        #[arg(long)]
        host: Option<String>,
    },

    /// Start an interactive chat session.
    Chat {
        /// Session kind: assistant or analytics.
        #[arg(short, long, default_value = "assistant", value_parser = parse_kind)]
        kind: SessionKind,
    },

    /// Ask a single question and print the answer.
    Ask {
        /// Session kind: assistant or analytics.
        #[arg(short, long, default_value = "assistant", value_parser = parse_kind)]
        kind: SessionKind,

        /// The question to send.
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },

    /// List customers.
    Customers {
        /// Match name, email or phone.
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List menu items.
    Menu {
        /// Match name or description.
        #[arg(short, long)]
        search: Option<String>,

        /// Exact category ("Todos" for every category).
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List reservations.
    Reservations {
        /// confirmed, pending, cancelled or all.
        #[arg(long)]
        status: Option<String>,

        /// Match customer name, location or phone.
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show the effective configuration.
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

fn parse_kind(value: &str) -> Result<SessionKind, String> {
    value.parse()
}

/// Steady-ticking spinner with `message`.
pub(crate) fn spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
