//! Core domain types for tic-tac-toe.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// A player's symbol.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum Mark {
    /// The human player (moves first).
    X,
    /// The computer opponent.
    O,
}

impl Mark {
    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A cell on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell holding a mark.
    Occupied(Mark),
}

impl Cell {
    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(mark) => Some(mark),
        }
    }
}

impl From<Option<Mark>> for Cell {
    fn from(mark: Option<Mark>) -> Self {
        mark.map_or(Cell::Empty, Cell::Occupied)
    }
}

/// Errors decoding a board from its linear form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// The sequence did not hold exactly nine cells.
    #[display("Board must have exactly 9 cells, got {}", len)]
    WrongLength {
        /// Number of cells supplied.
        len: usize,
    },
}

/// 3x3 tic-tac-toe board.
///
/// Boards are plain values: every operation in this crate that produces a
/// different board returns a fresh copy and leaves its input untouched.
///
/// On the wire a board is a sequence of nine `null | "X" | "O"` values in
/// row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "[Option<Mark>; 9]", try_from = "Vec<Option<Mark>>")]
pub struct Board {
    /// Cells in row-major order (0-8).
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; CELL_COUNT],
        }
    }

    /// Gets the cell at the given position (0-8).
    pub fn get(&self, pos: usize) -> Option<Cell> {
        self.cells.get(pos).copied()
    }

    /// Checks if a cell is empty. Out-of-range positions are never empty.
    pub fn is_empty(&self, pos: usize) -> bool {
        matches!(self.get(pos), Some(Cell::Empty))
    }

    /// Checks if every cell holds a mark.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| *c != Cell::Empty)
    }

    /// Returns all cells as a slice.
    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Iterates over the positions of empty cells in ascending order.
    pub fn empty_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Cell::Empty)
            .map(|(pos, _)| pos)
    }

    /// Returns a copy of this board with `pos` set to `cell`.
    ///
    /// Callers check the range first.
    pub(crate) fn with_cell(&self, pos: usize, cell: Cell) -> Self {
        let mut next = *self;
        next.cells[pos] = cell;
        next
    }
}

impl From<[Option<Mark>; CELL_COUNT]> for Board {
    fn from(marks: [Option<Mark>; CELL_COUNT]) -> Self {
        Self {
            cells: marks.map(Cell::from),
        }
    }
}

impl From<Board> for [Option<Mark>; CELL_COUNT] {
    fn from(board: Board) -> Self {
        board.cells.map(Cell::mark)
    }
}

impl TryFrom<Vec<Option<Mark>>> for Board {
    type Error = BoardError;

    fn try_from(marks: Vec<Option<Mark>>) -> Result<Self, Self::Error> {
        let len = marks.len();
        let marks: [Option<Mark>; CELL_COUNT] = marks
            .try_into()
            .map_err(|_| BoardError::WrongLength { len })?;
        Ok(Self::from(marks))
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                match self.cells[pos] {
                    Cell::Empty => write!(f, "{}", pos)?,
                    Cell::Occupied(mark) => write!(f, "{}", mark)?,
                }
                if col < 2 {
                    write!(f, "|")?;
                }
            }
            if row < 2 {
                write!(f, "\n-+-+-\n")?;
            }
        }
        Ok(())
    }
}

/// Outcome of a board as seen by the caller driving a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win.
    Won(Mark),
    /// Game ended in a draw.
    Draw,
}

impl GameStatus {
    /// Whether no further moves are accepted.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}
