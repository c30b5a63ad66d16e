//! Tic-tac-toe board, rules, and per-user game state.

mod position;
pub mod rules;
mod state;
mod types;

pub use position::Position;
pub use state::{GameOutcome, GameState, GameStatus, Statistics};
pub use types::{Board, BoardError, Cell, Mark};
