//! tictac_server - unified CLI

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use tictac_server::{FileConfig, GameRepository, GameService, ServerConfig, router};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tictac_server=debug")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.command)?;

    match cli.command {
        Command::Serve { .. } => run_http_server(config).await,
        Command::Migrate { .. } => run_migrations(&config).map(|_| ()),
    }
}

#[instrument(skip(command))]
fn load_config(command: &Command) -> Result<ServerConfig> {
    let (overrides, path) = command.overrides();
    let file = match path {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    Ok(ServerConfig::resolve(overrides, file)?)
}

#[instrument(skip(config), fields(database_url = %config.database_url()))]
fn run_migrations(config: &ServerConfig) -> Result<GameRepository> {
    let repo = GameRepository::new(config.database_url().clone())?;
    repo.run_migrations()?;
    Ok(repo)
}

/// Run the HTTP game server
async fn run_http_server(config: ServerConfig) -> Result<()> {
    let repo = run_migrations(&config)?;
    let app = router(GameService::new(repo, *config.opponent_seed()));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Server ready at http://{}/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
    }
    info!("Shutting down");
}
