//! Comanda CLI and REST API entry point.
//!
//! Binary name: `comanda`
//!
//! Parses CLI arguments, loads configuration and fixtures, wires the query
//! sessions, then dispatches to the appropriate command handler or starts
//! the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,comanda_core=debug,comanda_infra=debug,comanda_api=debug",
        _ => "trace",
    };
    comanda_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    comanda_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "comanda", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;

    match cli.command {
        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            serve(state, &host, port).await?;
        }

        Commands::Chat { kind } => {
            cli::chat::loop_runner::run_chat_loop(&state, kind).await?;
        }

        Commands::Ask { kind, prompt } => {
            cli::ask::ask(&state, kind, &prompt.join(" "), cli.json).await?;
        }

        Commands::Customers { search } => {
            cli::catalog::list_customers(&state, search, cli.json).await?;
        }

        Commands::Menu { search, category } => {
            cli::catalog::list_menu(&state, search, category, cli.json).await?;
        }

        Commands::Reservations { status, search } => {
            cli::catalog::list_reservations(&state, status, search, cli.json).await?;
        }

        Commands::Config => {
            cli::config::show_config(&state, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let base_url = state.config.query_service.base_url.clone();
    let router = http::router::build_router(state);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!(
        "\n  {} Comanda API listening on {}",
        console::style("▸").cyan().bold(),
        console::style(format!("http://{addr}/api/v1")).underlined()
    );
    println!(
        "  {}\n",
        console::style(format!("Query service: {base_url}")).dim()
    );
    tracing::info!(%addr, query_service = %base_url, "server started");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
