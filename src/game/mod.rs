//! Core Connect Four game logic: board representation, player types, and the
//! per-game session state.

mod board;
mod player;
mod state;

pub use board::{Board, Cell, COLS, ROWS, WINDOW_LENGTH};
pub use player::Player;
pub use state::{GameOutcome, GameState};

pub use crate::error::MoveError;
