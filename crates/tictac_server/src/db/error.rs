//! Database error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// What part of the game store failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DbErrorKind {
    /// Opening or configuring the SQLite file.
    #[display("connection")]
    Connection,
    /// Applying embedded migrations.
    #[display("migration")]
    Migration,
    /// A query or statement failed.
    #[display("query")]
    Query,
    /// A stored game row could not be decoded.
    #[display("corrupt record")]
    CorruptRecord,
}

/// Database error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Database error ({}): {} at {}:{}", kind, message, file, line)]
pub struct DbError {
    /// What failed.
    pub kind: DbErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DbError {
    /// Creates a new database error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: DbErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// A stored game whose columns do not decode.
    #[track_caller]
    pub fn corrupt(game_id: &str, detail: impl std::fmt::Display) -> Self {
        Self::new(
            DbErrorKind::CorruptRecord,
            format!("game {} has an unreadable {}", game_id, detail),
        )
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(DbErrorKind::Query, err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(DbErrorKind::Query, format!("Board encoding failed: {}", err))
    }
}
