//! Per-user game session state and statistics.

use super::{Board, Mark, Position};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Game is ongoing.
    #[display("in progress")]
    InProgress,
    /// The human completed a line.
    #[display("player won")]
    PlayerWon,
    /// The bot completed a line.
    #[display("bot won")]
    BotWon,
    /// Board filled with no line.
    #[display("draw")]
    Draw,
}

impl GameStatus {
    /// Returns true for `PlayerWon`, `BotWon` and `Draw`.
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }

    /// Status reached when `mark` completes a line.
    pub fn won_by(mark: Mark) -> Self {
        match mark {
            Mark::X => GameStatus::PlayerWon,
            Mark::O => GameStatus::BotWon,
        }
    }

    /// Converts a terminal status to the outcome seen by the human.
    pub fn outcome(self) -> Option<GameOutcome> {
        match self {
            GameStatus::InProgress => None,
            GameStatus::PlayerWon => Some(GameOutcome::Win),
            GameStatus::BotWon => Some(GameOutcome::Loss),
            GameStatus::Draw => Some(GameOutcome::Draw),
        }
    }
}

/// Complete per-user game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// The board.
    board: Board,
    /// Mark to move next.
    current_player: Mark,
    /// Game status.
    status: GameStatus,
}

impl GameState {
    /// Creates a new game: empty board, human to move, in progress.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Mark::PLAYER,
            status: GameStatus::InProgress,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the mark to move.
    pub fn current_player(&self) -> Mark {
        self.current_player
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns true once the game has ended.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Places `mark` at `pos` and re-evaluates the status.
    ///
    /// A completed line is checked before a full board, so a final move that
    /// does both is scored as a win.
    ///
    /// # Panics
    ///
    /// Panics if the game is already over or the cell is occupied.
    #[instrument(skip(self), fields(status = %self.status))]
    pub fn apply(&mut self, pos: Position, mark: Mark) -> GameStatus {
        assert!(
            !self.is_terminal(),
            "attempted to play {mark} at {pos} after the game ended"
        );
        self.board.place(pos, mark);
        self.current_player = mark.opponent();

        self.status = if self.board.has_win(mark) {
            GameStatus::won_by(mark)
        } else if self.board.is_full() {
            GameStatus::Draw
        } else {
            GameStatus::InProgress
        };

        debug!(status = %self.status, "Move applied");
        self.status
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Game outcome from the human's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameOutcome {
    /// Human won the game.
    Win,
    /// Bot won the game.
    Loss,
    /// Game ended in a draw.
    Draw,
}

impl GameOutcome {
    /// Short lowercase name, as logged.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Loss => "loss",
            Self::Draw => "draw",
        }
    }
}

/// Win/loss counters for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Completed games.
    pub games_played: u32,
    /// Games the human won.
    pub wins: u32,
    /// Games the human lost. Draws are counted here too.
    pub losses: u32,
}

impl Statistics {
    /// Creates statistics from raw counters.
    pub fn new(games_played: u32, wins: u32, losses: u32) -> Self {
        Self {
            games_played,
            wins,
            losses,
        }
    }

    /// Counts one concluded game.
    ///
    /// Draws increment `losses`; there is no separate draw counter.
    #[instrument(skip(self))]
    pub fn record(&mut self, outcome: GameOutcome) {
        self.games_played += 1;
        match outcome {
            GameOutcome::Win => self.wins += 1,
            GameOutcome::Loss | GameOutcome::Draw => self.losses += 1,
        }
    }

    /// Calculates win rate as a percentage (0.0-100.0).
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            (self.wins as f64 / self.games_played as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_is_empty_and_human_to_move() {
        let state = GameState::new();
        assert_eq!(state.board(), &Board::new());
        assert_eq!(state.current_player(), Mark::PLAYER);
        assert_eq!(state.status(), GameStatus::InProgress);
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_apply_alternates_turns() {
        let mut state = GameState::new();
        assert_eq!(state.apply(Position::Center, Mark::X), GameStatus::InProgress);
        assert_eq!(state.current_player(), Mark::O);
        assert_eq!(state.apply(Position::TopLeft, Mark::O), GameStatus::InProgress);
        assert_eq!(state.current_player(), Mark::X);
    }

    #[test]
    fn test_bot_line_is_bot_won() {
        let mut state = GameState::new();
        state.apply(Position::Center, Mark::X);
        state.apply(Position::TopLeft, Mark::O);
        state.apply(Position::BottomCenter, Mark::X);
        state.apply(Position::TopCenter, Mark::O);
        state.apply(Position::MiddleLeft, Mark::X);
        assert_eq!(state.apply(Position::TopRight, Mark::O), GameStatus::BotWon);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_win_on_full_board_is_win_not_draw() {
        // X O X / X O O / _ X O, then X takes the last cell and column 0.
        let mut state = GameState::new();
        let moves = [
            (Position::TopLeft, Mark::X),
            (Position::TopCenter, Mark::O),
            (Position::MiddleLeft, Mark::X),
            (Position::Center, Mark::O),
            (Position::TopRight, Mark::X),
            (Position::MiddleRight, Mark::O),
            (Position::BottomCenter, Mark::X),
            (Position::BottomRight, Mark::O),
        ];
        for (pos, mark) in moves {
            assert_eq!(state.apply(pos, mark), GameStatus::InProgress);
        }
        assert_eq!(state.apply(Position::BottomLeft, Mark::X), GameStatus::PlayerWon);
        assert!(state.board().is_full());
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let mut state = GameState::new();
        // X O X / X O O / O X X
        let moves = [
            (Position::TopLeft, Mark::X),
            (Position::TopCenter, Mark::O),
            (Position::TopRight, Mark::X),
            (Position::Center, Mark::O),
            (Position::MiddleLeft, Mark::X),
            (Position::MiddleRight, Mark::O),
            (Position::BottomCenter, Mark::X),
            (Position::BottomLeft, Mark::O),
        ];
        for (pos, mark) in moves {
            assert_eq!(state.apply(pos, mark), GameStatus::InProgress);
        }
        assert_eq!(state.apply(Position::BottomRight, Mark::X), GameStatus::Draw);
    }

    #[test]
    #[should_panic(expected = "after the game ended")]
    fn test_apply_after_terminal_panics() {
        let mut state = GameState::new();
        state.apply(Position::TopLeft, Mark::X);
        state.apply(Position::MiddleLeft, Mark::O);
        state.apply(Position::TopCenter, Mark::X);
        state.apply(Position::Center, Mark::O);
        state.apply(Position::TopRight, Mark::X);
        state.apply(Position::BottomRight, Mark::O);
    }

    #[test]
    fn test_status_outcomes() {
        assert_eq!(GameStatus::InProgress.outcome(), None);
        assert_eq!(GameStatus::PlayerWon.outcome(), Some(GameOutcome::Win));
        assert_eq!(GameStatus::BotWon.outcome(), Some(GameOutcome::Loss));
        assert_eq!(GameStatus::Draw.outcome(), Some(GameOutcome::Draw));
    }

    #[test]
    fn test_draw_counts_as_loss() {
        let mut stats = Statistics::default();
        stats.record(GameOutcome::Draw);
        assert_eq!(stats, Statistics::new(1, 0, 1));
    }

    #[test]
    fn test_record_increments_exactly_one_counter() {
        let mut stats = Statistics::default();
        stats.record(GameOutcome::Win);
        stats.record(GameOutcome::Loss);
        stats.record(GameOutcome::Win);
        assert_eq!(stats, Statistics::new(3, 2, 1));
        assert!((stats.win_rate() - 66.666).abs() < 0.01);
    }
}
