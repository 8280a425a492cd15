//! Tic-tac-toe versus the computer, served over HTTP.
//!
//! # Architecture
//!
//! - **Engine**: board rules and the computer opponent live in `tictac_engine`
//! - **Store**: one SQLite row per game, accessed through diesel
//! - **Service**: fetch, play, persist under a per-game lock
//! - **API**: axum routes translating JSON requests into service calls
//!
//! # Example
//!
//! ```no_run
//! use tictac_server::{GameRepository, GameService, router};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let repo = GameRepository::new("games.db".to_string())?;
//! repo.run_migrations()?;
//! let app = router(GameService::new(repo, None));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
mod config;
mod db;
mod locks;
mod service;

pub use api::{ApiError, CreateGameRequest, JoinGameRequest, MoveRequest, router};
pub use config::{ConfigError, FileConfig, Overrides, ServerConfig};
pub use db::{DbError, DbErrorKind, GameRecord, GameRepository, NewGameRecord};
pub use locks::GameLocks;
pub use service::{GameError, GameService, GameView, HUMAN};
