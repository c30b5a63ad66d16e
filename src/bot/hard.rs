//! Hard policy: win, then block, then center or corner, then random.

use super::{center_or_corner, random_empty};
use crate::games::tictactoe::{Board, Mark, Position};
use rand::Rng;

pub(super) fn decide<R: Rng + ?Sized>(board: &Board, mark: Mark, rng: &mut R) -> Option<Position> {
    board
        .find_winning_move(mark)
        .or_else(|| board.find_winning_move(mark.opponent()))
        .or_else(|| center_or_corner(board, rng))
        .or_else(|| random_empty(board, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_wins_over_blocking() {
        // X threatens row 0 at 2; O can complete column 1 at 7.
        let mut board = Board::new();
        board.place(Position::TopLeft, Mark::X);
        board.place(Position::TopCenter, Mark::O);
        board.place(Position::MiddleLeft, Mark::X);
        board.place(Position::Center, Mark::O);
        board.place(Position::MiddleRight, Mark::X);

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(decide(&board, Mark::O, &mut rng), Some(Position::BottomCenter));
        }
    }

    #[test]
    fn test_blocks_when_no_win() {
        let mut board = Board::new();
        board.place(Position::Center, Mark::X);
        board.place(Position::TopLeft, Mark::O);
        board.place(Position::BottomCenter, Mark::X);

        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(decide(&board, Mark::O, &mut rng), Some(Position::TopCenter));
    }

    #[test]
    fn test_corner_after_center_opening() {
        let mut board = Board::new();
        board.place(Position::Center, Mark::X);

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let pos = decide(&board, Mark::O, &mut rng).expect("board has space");
            assert!(Position::CORNERS.contains(&pos));
        }
    }

    #[test]
    fn test_opening_takes_center() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(decide(&Board::new(), Mark::O, &mut rng), Some(Position::Center));
    }
}
