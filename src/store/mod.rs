//! Persistence collaborator consumed by the move engine.
//!
//! Game state and statistics live behind [`GameStore`], keyed by an opaque
//! [`UserId`]. The engine never caches anything between requests.

mod error;
mod memory;

pub use error::StoreError;
pub use memory::MemoryStore;

use crate::games::tictactoe::{GameOutcome, GameState, Statistics};
use async_trait::async_trait;
use derive_getters::Getters;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Opaque user identity (an email address in practice).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wraps a raw identity string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A user's statistics and in-progress game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct UserProfile {
    user_id: UserId,
    statistics: Statistics,
    current_game: GameState,
}

impl UserProfile {
    /// Creates a profile snapshot.
    pub fn new(user_id: UserId, statistics: Statistics, current_game: GameState) -> Self {
        Self {
            user_id,
            statistics,
            current_game,
        }
    }
}

/// Key-value persistence for per-user game state and statistics.
///
/// Implementations create a default record the first time a user is seen.
/// Callers serialize access per user; implementations need not.
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Loads the user's current game, creating a fresh one if absent.
    async fn load_game_state(&self, user: &UserId) -> Result<GameState, StoreError>;

    /// Stores an in-progress game.
    async fn save_in_progress_state(&self, user: &UserId, state: &GameState)
    -> Result<(), StoreError>;

    /// Counts a concluded game and resets the user's board, as one unit.
    ///
    /// Returns the updated statistics.
    async fn record_outcome_and_reset_state(
        &self,
        user: &UserId,
        outcome: GameOutcome,
    ) -> Result<Statistics, StoreError>;

    /// Loads the user's profile, creating the user if absent.
    async fn load_profile(&self, user: &UserId) -> Result<UserProfile, StoreError>;
}
