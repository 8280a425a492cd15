//! Game rules for tic-tac-toe.
//!
//! Pure functions evaluating a board according to tic-tac-toe rules.
//! Rules are kept apart from board storage so callers can compose them
//! into their own turn handling.

pub mod draw;
pub mod win;

pub use draw::{detect_draw, game_status};
pub use win::{LINES, Line, detect_winner};
