//! One full turn against the bot.

use super::EngineError;
use crate::bot::{BotStrategy, Difficulty};
use crate::games::tictactoe::{Board, GameState, GameStatus, Mark, Position};
use crate::store::{GameStore, UserId};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Message returned when the requested cell already holds a mark.
pub const SPOT_TAKEN_MESSAGE: &str = "This spot is already taken. Please choose another spot.";

/// Requested cell, zero-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Row, 0-2.
    pub row: i64,
    /// Column, 0-2.
    pub column: i64,
}

impl MoveRequest {
    /// Creates a move request.
    pub fn new(row: i64, column: i64) -> Self {
        Self { row, column }
    }
}

/// Board and status after a completed turn.
///
/// When the game ended this turn, `board` is the final board; the stored
/// game has already been reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResult {
    /// Board after the turn.
    pub board: Board,
    /// Status after the turn.
    pub status: GameStatus,
    /// Cell the bot took, if it moved.
    pub bot_move: Option<Position>,
}

/// Reply to a move request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MoveOutcome {
    /// The turn was played.
    Played(TurnResult),
    /// The cell was occupied; nothing changed.
    SpotTaken {
        /// User-facing message.
        error: String,
    },
}

impl MoveOutcome {
    fn spot_taken() -> Self {
        MoveOutcome::SpotTaken {
            error: SPOT_TAKEN_MESSAGE.to_string(),
        }
    }
}

/// Plays turns for any number of users against the bot.
///
/// The engine holds no per-user state. Callers must not run two
/// [`MoveEngine::handle_move`] calls for the same user at once.
#[derive(Debug)]
pub struct MoveEngine<S> {
    store: S,
    rng: Mutex<StdRng>,
}

impl<S: GameStore> MoveEngine<S> {
    /// Creates an engine whose bot draws randomness from the OS.
    #[instrument(skip(store))]
    pub fn new(store: S) -> Self {
        info!("Creating MoveEngine");
        Self {
            store,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Creates an engine with a reproducible bot.
    #[instrument(skip(store))]
    pub fn with_seed(store: S, seed: u64) -> Self {
        info!(seed, "Creating seeded MoveEngine");
        Self {
            store,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Returns the persistence collaborator.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Plays the human's move and, unless the game ended, the bot's reply.
    ///
    /// Input is validated before the store is read. An occupied cell yields
    /// [`MoveOutcome::SpotTaken`] without writing anything. A finished game is
    /// recorded and reset through the store; otherwise the updated game is
    /// saved.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownDifficulty`] or
    /// [`EngineError::InvalidInput`] for bad input, and
    /// [`EngineError::Store`] if loading or saving fails.
    ///
    /// # Panics
    ///
    /// Panics if the bot finds no cell on a board that is not finished.
    #[instrument(skip(self, user), fields(user = %user))]
    pub async fn handle_move(
        &self,
        user: &UserId,
        difficulty: &str,
        request: MoveRequest,
    ) -> Result<MoveOutcome, EngineError> {
        let difficulty = Difficulty::from_str(difficulty).map_err(|_| {
            warn!(difficulty, "Unknown difficulty");
            EngineError::UnknownDifficulty(difficulty.to_string())
        })?;
        let pos = Position::from_row_column(request.row, request.column).ok_or_else(|| {
            warn!(row = request.row, column = request.column, "Move out of range");
            EngineError::InvalidInput {
                row: request.row,
                column: request.column,
            }
        })?;

        let mut state = self.store.load_game_state(user).await?;
        if state.is_terminal() {
            debug!(status = %state.status(), "Stored game already finished, starting fresh");
            state = GameState::new();
        }

        if state.board().is_occupied(pos) {
            info!(%pos, "Spot already taken");
            return Ok(MoveOutcome::spot_taken());
        }

        let status = state.apply(pos, Mark::PLAYER);
        debug!(%pos, %status, "Human move applied");
        if status.is_terminal() {
            return self.finish(user, state, None).await;
        }

        let strategy = BotStrategy::from(difficulty);
        let bot_pos = self.decide(strategy, state.board());
        let status = state.apply(bot_pos, Mark::BOT);
        debug!(pos = %bot_pos, %status, ?strategy, "Bot move applied");
        if status.is_terminal() {
            return self.finish(user, state, Some(bot_pos)).await;
        }

        self.store.save_in_progress_state(user, &state).await?;
        Ok(MoveOutcome::Played(TurnResult {
            board: state.board().clone(),
            status,
            bot_move: Some(bot_pos),
        }))
    }

    /// Asks the strategy for a cell on a board that still has space.
    fn decide(&self, strategy: BotStrategy, board: &Board) -> Position {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match strategy.decide(board, Mark::BOT, &mut *rng) {
            Some(pos) => pos,
            None => panic!("{strategy:?} bot found no move on an unfinished board"),
        }
    }

    /// Records a finished game and builds the final reply.
    async fn finish(
        &self,
        user: &UserId,
        state: GameState,
        bot_move: Option<Position>,
    ) -> Result<MoveOutcome, EngineError> {
        let status = state.status();
        let Some(outcome) = status.outcome() else {
            unreachable!("finish called on a game in progress");
        };
        let stats = self
            .store
            .record_outcome_and_reset_state(user, outcome)
            .await?;
        info!(
            %status,
            games_played = stats.games_played,
            wins = stats.wins,
            losses = stats.losses,
            "Game finished"
        );
        Ok(MoveOutcome::Played(TurnResult {
            board: state.board().clone(),
            status,
            bot_move,
        }))
    }
}
