//! Persistence layer: one row per game holding the current board.

mod error;
mod models;
mod repository;
mod schema;

pub use error::{DbError, DbErrorKind};
pub use models::{GameRecord, NewGameRecord};
pub use repository::GameRepository;
