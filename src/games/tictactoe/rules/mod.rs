//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](super::Board). Rules are kept apart from
//! board storage so bot strategies and the game state share one definition
//! of a win.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{LINES, find_winning_move, has_win, winner};

use super::{Board, Mark, Position};

// ─────────────────────────────────────────────────────────────
//  Board helper methods
// ─────────────────────────────────────────────────────────────

impl Board {
    /// Returns true if `mark` fills any of the eight lines.
    pub fn has_win(&self, mark: Mark) -> bool {
        has_win(self, mark)
    }

    /// Returns the mark that fills a line, if any.
    pub fn winner(&self) -> Option<Mark> {
        winner(self)
    }

    /// Checks if the board is full.
    pub fn is_full(&self) -> bool {
        is_full(self)
    }

    /// Finds the cell that would complete a line for `mark`.
    pub fn find_winning_move(&self, mark: Mark) -> Option<Position> {
        find_winning_move(self, mark)
    }
}
