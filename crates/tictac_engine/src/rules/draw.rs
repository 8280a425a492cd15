//! Draw detection logic for tic-tac-toe.

use super::win::detect_winner;
use crate::{Board, GameStatus};
use tracing::instrument;

/// Checks if the board is a draw: every cell filled and no winner.
///
/// A full board that also holds a winning line is a win, not a draw.
#[instrument(skip(board))]
pub fn detect_draw(board: &Board) -> bool {
    board.is_full() && detect_winner(board).is_none()
}

/// Derives the status of a board. Wins take precedence over draws.
#[instrument(skip(board))]
pub fn game_status(board: &Board) -> GameStatus {
    if let Some(winner) = detect_winner(board) {
        GameStatus::Won(winner)
    } else if board.is_full() {
        GameStatus::Draw
    } else {
        GameStatus::InProgress
    }
}
