//! Move validation and placement.

use crate::rules::{detect_draw, detect_winner};
use crate::{Board, CELL_COUNT, Cell, Mark};
use derive_more::{Display, Error};
use tracing::{debug, instrument};

/// Reasons a move is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// The board already holds a winning line.
    #[display("Game already finished (winner decided)")]
    GameAlreadyWon,
    /// The board is full with no winner.
    #[display("Game already finished (draw)")]
    GameAlreadyDrawn,
    /// Position outside 0-8.
    #[display("Invalid position {}. Must be 0-8", position)]
    InvalidPosition {
        /// The rejected position.
        position: usize,
    },
    /// The target cell already holds a mark.
    #[display("Cell {} already taken", position)]
    CellOccupied {
        /// The occupied position.
        position: usize,
    },
}

/// Returns a fresh board with every cell empty.
pub fn create_empty_board() -> Board {
    Board::new()
}

/// Checks whether a move at `position` would be accepted.
///
/// Checks run in order: finished by a win, finished by a draw, position in
/// range, cell free. A board that is both full and won reports
/// [`MoveError::GameAlreadyWon`]. The board is only indexed after the range
/// check passes.
///
/// # Errors
///
/// Returns the first [`MoveError`] that applies.
#[instrument(skip(board))]
pub fn validate_move(board: &Board, position: usize) -> Result<(), MoveError> {
    if detect_winner(board).is_some() {
        return Err(MoveError::GameAlreadyWon);
    }
    if detect_draw(board) {
        return Err(MoveError::GameAlreadyDrawn);
    }
    check_free(board, position)
}

/// Returns a new board with `mark` placed at `position`.
///
/// Only range and occupancy are checked; finished games are
/// [`validate_move`]'s concern.
///
/// # Errors
///
/// Returns [`MoveError::InvalidPosition`] or [`MoveError::CellOccupied`].
#[instrument(skip(board))]
pub fn place_mark(board: &Board, position: usize, mark: Mark) -> Result<Board, MoveError> {
    check_free(board, position)?;
    debug!(position, %mark, "Placing mark");
    Ok(board.with_cell(position, Cell::Occupied(mark)))
}

fn check_free(board: &Board, position: usize) -> Result<(), MoveError> {
    if position >= CELL_COUNT {
        return Err(MoveError::InvalidPosition { position });
    }
    if !board.is_empty(position) {
        return Err(MoveError::CellOccupied { position });
    }
    Ok(())
}
