//! Pure tic-tac-toe rules and a computer opponent.
//!
//! Everything here is a synchronous function from a [`Board`] value to a new
//! [`Board`] value or a predicate. Nothing is persisted and no shared state is
//! held, so every function is safe to call from any number of threads.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use tictac_engine::{
//!     Mark, compute_opponent_move, create_empty_board, detect_winner, place_mark,
//!     validate_move,
//! };
//!
//! # fn main() -> Result<(), tictac_engine::MoveError> {
//! let mut rng = StdRng::seed_from_u64(1);
//! let board = create_empty_board();
//! validate_move(&board, 4)?;
//! let board = place_mark(&board, 4, Mark::X)?;
//! let board = compute_opponent_move(&board, &mut rng);
//! assert_eq!(detect_winner(&board), None);
//! assert_eq!(board.empty_positions().count(), 7);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod moves;
mod opponent;
pub mod rules;
mod types;

pub use moves::{MoveError, create_empty_board, place_mark, validate_move};
pub use opponent::{COMPUTER, compute_opponent_move};
pub use rules::{LINES, Line, detect_draw, detect_winner, game_status};
pub use types::{Board, BoardError, CELL_COUNT, Cell, GameStatus, Mark};
