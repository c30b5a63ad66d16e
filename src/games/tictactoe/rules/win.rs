//! Win detection logic for tic-tac-toe.

use super::super::{Board, Cell, Mark, Position};
use tracing::instrument;

/// The eight winning lines, in fixed order: rows, then columns, then diagonals.
pub const LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
    ],
    [
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ],
    // Columns
    [
        Position::TopLeft,
        Position::MiddleLeft,
        Position::BottomLeft,
    ],
    [
        Position::TopCenter,
        Position::Center,
        Position::BottomCenter,
    ],
    [
        Position::TopRight,
        Position::MiddleRight,
        Position::BottomRight,
    ],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Returns true if `mark` fills any of the eight lines.
#[instrument(skip(board))]
pub fn has_win(board: &Board, mark: Mark) -> bool {
    let target = Cell::Occupied(mark);
    LINES
        .iter()
        .any(|line| line.iter().all(|&pos| board.get(pos) == target))
}

/// Returns the mark that fills a line, if any.
#[instrument(skip(board))]
pub fn winner(board: &Board) -> Option<Mark> {
    [Mark::X, Mark::O]
        .into_iter()
        .find(|&mark| has_win(board, mark))
}

/// Finds the empty cell that would complete a line for `mark`.
///
/// Lines are scanned in [`LINES`] order and the first hit is returned. Within
/// a line `[a, b, c]` the gap is checked at `c`, then `b`, then `a`.
#[instrument(skip(board))]
pub fn find_winning_move(board: &Board, mark: Mark) -> Option<Position> {
    let own = Cell::Occupied(mark);
    for [a, b, c] in LINES {
        let (ca, cb, cc) = (board.get(a), board.get(b), board.get(c));
        if ca == own && cb == own && cc == Cell::Empty {
            return Some(c);
        } else if ca == own && cc == own && cb == Cell::Empty {
            return Some(b);
        } else if cb == own && cc == own && ca == Cell::Empty {
            return Some(a);
        }
    }

    None
}
