//! Computer opponent.
//!
//! A greedy heuristic, not a perfect player: take a winning cell if one
//! exists, otherwise block the human's winning cell, otherwise play a
//! uniformly random empty cell.

use crate::rules::{LINES, Line};
use crate::{Board, Cell, Mark};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, instrument};

/// Mark played by the computer.
pub const COMPUTER: Mark = Mark::O;

/// Returns a new board with the computer's reply placed.
///
/// Priority order, each scan following [`LINES`] order:
/// 1. complete a line holding two `O` and one empty cell;
/// 2. block a line holding two `X` and one empty cell;
/// 3. pick an empty cell uniformly at random from `rng`.
///
/// A full board is returned unchanged. The caller is expected not to call
/// this on a finished game.
#[instrument(skip(board, rng))]
pub fn compute_opponent_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Board {
    if let Some(pos) = completing_cell(board, COMPUTER) {
        debug!(position = pos, "Computer takes winning cell");
        return board.with_cell(pos, Cell::Occupied(COMPUTER));
    }

    if let Some(pos) = completing_cell(board, COMPUTER.opponent()) {
        debug!(position = pos, "Computer blocks");
        return board.with_cell(pos, Cell::Occupied(COMPUTER));
    }

    let empty: Vec<usize> = board.empty_positions().collect();
    match empty.choose(rng) {
        Some(&pos) => {
            debug!(position = pos, choices = empty.len(), "Computer plays random cell");
            board.with_cell(pos, Cell::Occupied(COMPUTER))
        }
        None => {
            debug!("Board full, computer passes");
            *board
        }
    }
}

/// Finds the empty cell of the first line where `mark` holds the other two.
fn completing_cell(board: &Board, mark: Mark) -> Option<usize> {
    LINES
        .iter()
        .find_map(|line| completing_cell_in_line(board, line, mark))
}

fn completing_cell_in_line(board: &Board, line: &Line, mark: Mark) -> Option<usize> {
    let cells = board.cells();
    let owned = line
        .iter()
        .filter(|&&pos| cells[pos] == Cell::Occupied(mark))
        .count();
    let mut empty = line.iter().copied().filter(|&pos| cells[pos] == Cell::Empty);

    match (owned, empty.next(), empty.next()) {
        (2, Some(pos), None) => Some(pos),
        _ => None,
    }
}
