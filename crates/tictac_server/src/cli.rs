//! Command-line interface for tictac_server.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tictac_server::Overrides;

/// Tic-tac-toe versus the computer over HTTP
#[derive(Parser, Debug)]
#[command(name = "tictac_server")]
#[command(about = "Tic-tac-toe game server with a computer opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Database settings
        #[command(flatten)]
        db: DbArgs,

        /// Port to bind to
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Seed for the computer opponent (reproducible games)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Apply database migrations and exit
    Migrate {
        /// Database settings
        #[command(flatten)]
        db: DbArgs,
    },
}

/// Where to find the database.
#[derive(Args, Debug)]
pub struct DbArgs {
    /// Path to the SQLite database file (created if it doesn't exist)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Optional TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Command {
    /// Splits the command into config overrides and the config file path.
    pub fn overrides(&self) -> (Overrides, Option<&PathBuf>) {
        match self {
            Command::Serve {
                db,
                port,
                host,
                seed,
            } => (
                Overrides {
                    database_url: db.database_url.clone(),
                    host: host.clone(),
                    port: *port,
                    opponent_seed: *seed,
                },
                db.config.as_ref(),
            ),
            Command::Migrate { db } => (
                Overrides {
                    database_url: db.database_url.clone(),
                    ..Default::default()
                },
                db.config.as_ref(),
            ),
        }
    }
}
