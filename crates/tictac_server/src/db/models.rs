//! Database models.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tictac_engine::{Board, Mark};
use tracing::instrument;

use crate::db::{DbError, schema};

/// A stored game.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GameRecord {
    id: String,
    /// Board in its JSON wire form.
    board: String,
    player: Option<String>,
    guest: Option<String>,
    winner: Option<String>,
    created_at: NaiveDateTime,
}

impl GameRecord {
    /// Decodes the stored board.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the column does not hold a nine-cell board.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn decode_board(&self) -> Result<Board, DbError> {
        serde_json::from_str(&self.board)
            .map_err(|e| DbError::corrupt(&self.id, format!("board column: {}", e)))
    }

    /// Parses the stored winner.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the column holds something other than `X` or `O`.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn winner_mark(&self) -> Result<Option<Mark>, DbError> {
        self.winner
            .as_deref()
            .map(|w| {
                w.parse::<Mark>()
                    .map_err(|_| DbError::corrupt(&self.id, format!("winner column: '{}'", w)))
            })
            .transpose()
    }
}

/// Insertable game for creating new rows.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::games)]
pub struct NewGameRecord {
    id: String,
    board: String,
    player: Option<String>,
}

impl NewGameRecord {
    /// Builds a row for a fresh game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the board cannot be encoded.
    #[instrument(skip(board))]
    pub fn for_board(id: String, board: &Board, player: Option<String>) -> Result<Self, DbError> {
        Ok(Self::new(id, serde_json::to_string(board)?, player))
    }
}
