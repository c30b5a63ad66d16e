//! In-process store for tests and throwaway servers.

use super::{GameStore, StoreError, UserId, UserProfile};
use crate::games::tictactoe::{GameOutcome, GameState, Statistics};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Default)]
struct UserRecord {
    statistics: Statistics,
    current_game: GameState,
}

/// Store backed by a shared in-memory map.
///
/// Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Arc<Mutex<HashMap<UserId, UserRecord>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory store");
        Self::default()
    }

    /// Lists known users with their statistics, ordered by identity.
    #[instrument(skip(self))]
    pub fn list_users(&self) -> Result<Vec<(UserId, Statistics)>, StoreError> {
        let users = self.lock()?;
        let mut listed: Vec<_> = users
            .iter()
            .map(|(id, record)| (id.clone(), record.statistics))
            .collect();
        listed.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(listed)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<UserId, UserRecord>>, StoreError> {
        self.users
            .lock()
            .map_err(|e| StoreError::new(format!("Store lock poisoned: {}", e)))
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    #[instrument(skip(self, user), fields(user = %user))]
    async fn load_game_state(&self, user: &UserId) -> Result<GameState, StoreError> {
        let mut users = self.lock()?;
        let record = users.entry(user.clone()).or_default();
        debug!(status = %record.current_game.status(), "Game state loaded");
        Ok(record.current_game.clone())
    }

    #[instrument(skip(self, user, state), fields(user = %user, status = %state.status()))]
    async fn save_in_progress_state(
        &self,
        user: &UserId,
        state: &GameState,
    ) -> Result<(), StoreError> {
        let mut users = self.lock()?;
        users.entry(user.clone()).or_default().current_game = state.clone();
        debug!("Game state saved");
        Ok(())
    }

    #[instrument(skip(self, user), fields(user = %user))]
    async fn record_outcome_and_reset_state(
        &self,
        user: &UserId,
        outcome: GameOutcome,
    ) -> Result<Statistics, StoreError> {
        let mut users = self.lock()?;
        let record = users.entry(user.clone()).or_default();
        record.statistics.record(outcome);
        record.current_game = GameState::new();
        info!(
            games_played = record.statistics.games_played,
            wins = record.statistics.wins,
            losses = record.statistics.losses,
            "Outcome recorded"
        );
        Ok(record.statistics)
    }

    #[instrument(skip(self, user), fields(user = %user))]
    async fn load_profile(&self, user: &UserId) -> Result<UserProfile, StoreError> {
        let mut users = self.lock()?;
        let record = users.entry(user.clone()).or_default();
        Ok(UserProfile::new(
            user.clone(),
            record.statistics,
            record.current_game.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::{GameStatus, Mark, Position};

    #[tokio::test]
    async fn test_unknown_user_gets_fresh_game() {
        let store = MemoryStore::new();
        let state = store.load_game_state(&"new@example.com".into()).await.unwrap();
        assert_eq!(state, GameState::new());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = MemoryStore::new();
        let user = UserId::from("a@example.com");
        let mut state = GameState::new();
        state.apply(Position::Center, Mark::X);
        store.save_in_progress_state(&user, &state).await.unwrap();

        let loaded = store.load_game_state(&user).await.unwrap();
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_record_outcome_resets_game() {
        let store = MemoryStore::new();
        let user = UserId::from("b@example.com");
        let mut state = GameState::new();
        state.apply(Position::Center, Mark::X);
        store.save_in_progress_state(&user, &state).await.unwrap();

        let stats = store
            .record_outcome_and_reset_state(&user, GameOutcome::Win)
            .await
            .unwrap();
        assert_eq!(stats, Statistics::new(1, 1, 0));

        let profile = store.load_profile(&user).await.unwrap();
        assert_eq!(profile.current_game().status(), GameStatus::InProgress);
        assert_eq!(profile.current_game().board().occupied_count(), 0);
        assert_eq!(*profile.statistics(), stats);
    }

    #[tokio::test]
    async fn test_users_are_independent() {
        let store = MemoryStore::new();
        store
            .record_outcome_and_reset_state(&"x@example.com".into(), GameOutcome::Loss)
            .await
            .unwrap();

        let other = store.load_profile(&"y@example.com".into()).await.unwrap();
        assert_eq!(*other.statistics(), Statistics::default());

        let listed = store.list_users().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].0, UserId::from("x@example.com"));
    }
}
