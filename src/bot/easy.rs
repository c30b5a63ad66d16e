//! Easy policy: any empty cell.

use super::random_empty;
use crate::games::tictactoe::{Board, Position};
use rand::Rng;

pub(super) fn decide<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Position> {
    random_empty(board, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::Mark;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_picks_only_empty_cells() {
        let mut board = Board::new();
        board.place(Position::TopLeft, Mark::X);
        board.place(Position::Center, Mark::O);
        board.place(Position::BottomRight, Mark::X);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let pos = decide(&board, &mut rng).expect("board has space");
            assert!(board.is_empty(pos));
        }
    }

    #[test]
    fn test_reaches_every_empty_cell() {
        let board = Board::new();
        let mut rng = StdRng::seed_from_u64(11);
        let seen: HashSet<Position> = (0..500).filter_map(|_| decide(&board, &mut rng)).collect();
        assert_eq!(seen.len(), 9);
    }

    #[test]
    fn test_last_cell_is_forced() {
        let mut board = Board::new();
        for pos in &Position::ALL[..8] {
            board.place(*pos, Mark::X);
        }
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(decide(&board, &mut rng), Some(Position::BottomRight));
    }
}
