//! Database models.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tracing::instrument;

use crate::db::{DbError, schema};
use crate::games::tictactoe::{GameState, Statistics};

/// User row: identity, counters, and the serialized current game.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::users)]
pub struct User {
    id: i32,
    user_key: String,
    games_played: i32,
    wins: i32,
    losses: i32,
    current_game: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl User {
    /// Returns the stored counters.
    pub fn statistics(&self) -> Statistics {
        Statistics::new(
            counter(self.games_played),
            counter(self.wins),
            counter(self.losses),
        )
    }

    /// Decodes the stored current game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the column does not hold a valid game.
    #[instrument(skip(self), fields(user_key = %self.user_key))]
    pub fn game_state(&self) -> Result<GameState, DbError> {
        Ok(serde_json::from_str(&self.current_game)?)
    }
}

fn counter(value: i32) -> u32 {
    u32::try_from(value).unwrap_or_default()
}

/// Insertable user model for creating new users.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::users)]
pub struct NewUser {
    user_key: String,
    current_game: String,
}
