//! Medium policy: block, then center or corner, then random.

use super::{center_or_corner, random_empty};
use crate::games::tictactoe::{Board, Mark, Position};
use rand::Rng;

pub(super) fn decide<R: Rng + ?Sized>(board: &Board, mark: Mark, rng: &mut R) -> Option<Position> {
    board
        .find_winning_move(mark.opponent())
        .or_else(|| center_or_corner(board, rng))
        .or_else(|| random_empty(board, rng))
}
