//! Bot move selection.
//!
//! Three policies, one per [`Difficulty`]. Each is a pure function of the
//! board, the bot's mark, and a random source; none of them mutate the board.
//! The caller applies the chosen position.

mod difficulty;
mod easy;
mod hard;
mod medium;

pub use difficulty::Difficulty;

use crate::games::tictactoe::{Board, Mark, Position};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

/// Bot decision policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BotStrategy {
    /// Uniformly random empty cell.
    Easy,
    /// Block, then center or corner, then random.
    Medium,
    /// Win, then block, then center or corner, then random.
    Hard,
}

impl BotStrategy {
    /// Chooses the bot's next cell.
    ///
    /// Returns `None` only when the board is full.
    #[instrument(skip(board, rng), fields(occupied = board.occupied_count()))]
    pub fn decide<R: Rng + ?Sized>(
        self,
        board: &Board,
        mark: Mark,
        rng: &mut R,
    ) -> Option<Position> {
        let choice = match self {
            BotStrategy::Easy => easy::decide(board, rng),
            BotStrategy::Medium => medium::decide(board, mark, rng),
            BotStrategy::Hard => hard::decide(board, mark, rng),
        };
        debug!(?choice, "Bot decided");
        choice
    }
}

impl From<Difficulty> for BotStrategy {
    fn from(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => BotStrategy::Easy,
            Difficulty::Medium => BotStrategy::Medium,
            Difficulty::Hard => BotStrategy::Hard,
        }
    }
}

/// Picks uniformly among all empty cells.
fn random_empty<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Position> {
    board.empty_positions().choose(rng).copied()
}

/// Center if free, else a random free corner.
fn center_or_corner<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Position> {
    if board.is_empty(Position::Center) {
        return Some(Position::Center);
    }
    let corners: Vec<Position> = Position::CORNERS
        .into_iter()
        .filter(|pos| board.is_empty(*pos))
        .collect();
    corners.choose(rng).copied()
}
