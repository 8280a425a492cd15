//! Win detection logic for tic-tac-toe.

use crate::{Board, Cell, Mark};
use tracing::instrument;

/// Three board indices forming a row, column or diagonal.
pub type Line = [usize; 3];

/// Every winning line, in evaluation order.
pub const LINES: [Line; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Checks if there is a winner on the board.
///
/// Lines are scanned in [`LINES`] order and the first complete line wins.
/// That order only matters for boards holding complete lines of both
/// marks, which legal play never produces.
#[instrument(skip(board))]
pub fn detect_winner(board: &Board) -> Option<Mark> {
    let cells = board.cells();
    LINES.iter().find_map(|&[a, b, c]| match cells[a] {
        Cell::Occupied(mark) if cells[b] == cells[a] && cells[c] == cells[a] => Some(mark),
        _ => None,
    })
}
