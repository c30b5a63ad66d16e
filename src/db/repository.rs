//! Database repository for user statistics and current games.

use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{DbError, NewUser, User, schema};
use crate::games::tictactoe::{GameOutcome, GameState, Statistics};
use crate::store::{GameStore, StoreError, UserId, UserProfile};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a connection waits on another writer before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Database repository for user and game operations.
///
/// Each call opens its own connection, so clones can move freely between
/// blocking tasks.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a repository for the database at the given path.
    ///
    /// The schema is not touched; see [`GameRepository::open`].
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Self {
        info!(path = %db_path, "Creating GameRepository");
        Self { db_path }
    }

    /// Creates a repository, switches the file to WAL journaling, and
    /// applies pending migrations.
    ///
    /// The SQLite file is created if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        let repo = Self::new(db_path);
        repo.connection()?
            .batch_execute("PRAGMA journal_mode = WAL;")
            .map_err(|e| DbError::new(format!("Failed to enable WAL: {}", e)))?;
        repo.run_migrations()?;
        Ok(repo)
    }

    /// Applies pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migration failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Establishes a database connection that waits out other writers.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e))
        })?;
        conn.batch_execute(&format!("PRAGMA busy_timeout = {};", BUSY_TIMEOUT_MS))?;
        Ok(conn)
    }

    /// Returns an existing user or inserts one with a fresh game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_or_create_user(&self, user_key: &str) -> Result<User, DbError> {
        let mut conn = self.connection()?;
        get_or_create(&mut conn, user_key)
    }

    /// Gets a user by key. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_user(&self, user_key: &str) -> Result<Option<User>, DbError> {
        let mut conn = self.connection()?;
        find_user(&mut conn, user_key)
    }

    /// Lists all users, ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_users(&self) -> Result<Vec<User>, DbError> {
        debug!("Listing all users");
        let mut conn = self.connection()?;

        let users = schema::users::table
            .order((schema::users::created_at.asc(), schema::users::id.asc()))
            .select(User::as_select())
            .load(&mut conn)?;

        info!(count = users.len(), "Users loaded");
        Ok(users)
    }

    /// Overwrites the user's current game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, state), fields(status = %state.status()))]
    pub fn save_current_game(&self, user_key: &str, state: &GameState) -> Result<(), DbError> {
        let encoded = serde_json::to_string(state)?;
        let mut conn = self.connection()?;

        conn.immediate_transaction(|conn| {
            get_or_create(conn, user_key)?;
            diesel::update(schema::users::table.filter(schema::users::user_key.eq(user_key)))
                .set((
                    schema::users::current_game.eq(&encoded),
                    schema::users::updated_at.eq(diesel::dsl::now),
                ))
                .execute(conn)?;
            Ok::<_, DbError>(())
        })?;

        debug!("Current game saved");
        Ok(())
    }

    /// Increments the counters for `outcome` and resets the current game,
    /// in one transaction.
    ///
    /// Draws increment `losses`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn record_outcome(&self, user_key: &str, outcome: GameOutcome) -> Result<User, DbError> {
        use schema::users::dsl;

        let fresh = serde_json::to_string(&GameState::new())?;
        let (wins_delta, losses_delta) = match outcome {
            GameOutcome::Win => (1, 0),
            GameOutcome::Loss | GameOutcome::Draw => (0, 1),
        };
        let mut conn = self.connection()?;

        let user = conn.immediate_transaction(|conn| {
            get_or_create(conn, user_key)?;
            let user = diesel::update(dsl::users.filter(dsl::user_key.eq(user_key)))
                .set((
                    dsl::games_played.eq(dsl::games_played + 1),
                    dsl::wins.eq(dsl::wins + wins_delta),
                    dsl::losses.eq(dsl::losses + losses_delta),
                    dsl::current_game.eq(&fresh),
                    dsl::updated_at.eq(diesel::dsl::now),
                ))
                .returning(User::as_returning())
                .get_result(conn)?;
            Ok::<_, DbError>(user)
        })?;

        info!(
            user_id = user.id(),
            outcome = outcome.as_str(),
            games_played = user.games_played(),
            wins = user.wins(),
            losses = user.losses(),
            "Game outcome recorded"
        );
        Ok(user)
    }

    /// Runs a blocking repository call off the async executor.
    async fn blocking<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(GameRepository) -> Result<T, DbError> + Send + 'static,
    {
        let repo = self.clone();
        Ok(tokio::task::spawn_blocking(move || f(repo)).await??)
    }
}

fn find_user(conn: &mut SqliteConnection, user_key: &str) -> Result<Option<User>, DbError> {
    let user = schema::users::table
        .filter(schema::users::user_key.eq(user_key))
        .select(User::as_select())
        .first(conn)
        .optional()?;
    Ok(user)
}

/// Inserts the user unless the key exists, then reads the row back.
///
/// `INSERT OR IGNORE` keeps two first requests for one key from colliding on
/// the unique constraint.
fn get_or_create(conn: &mut SqliteConnection, user_key: &str) -> Result<User, DbError> {
    if let Some(user) = find_user(conn, user_key)? {
        return Ok(user);
    }

    let new_user = NewUser::new(user_key.to_string(), serde_json::to_string(&GameState::new())?);
    let inserted = diesel::insert_or_ignore_into(schema::users::table)
        .values(&new_user)
        .execute(conn)?;
    if inserted > 0 {
        info!(user_key, "Created new user");
    }

    find_user(conn, user_key)?
        .ok_or_else(|| DbError::new(format!("User '{}' missing after insert", user_key)))
}

#[async_trait]
impl GameStore for GameRepository {
    #[instrument(skip(self, user), fields(user = %user))]
    async fn load_game_state(&self, user: &UserId) -> Result<GameState, StoreError> {
        let key = user.as_str().to_string();
        self.blocking(move |repo| repo.get_or_create_user(&key)?.game_state())
            .await
    }

    #[instrument(skip(self, user, state), fields(user = %user, status = %state.status()))]
    async fn save_in_progress_state(
        &self,
        user: &UserId,
        state: &GameState,
    ) -> Result<(), StoreError> {
        let key = user.as_str().to_string();
        let state = state.clone();
        self.blocking(move |repo| repo.save_current_game(&key, &state))
            .await
    }

    #[instrument(skip(self, user), fields(user = %user))]
    async fn record_outcome_and_reset_state(
        &self,
        user: &UserId,
        outcome: GameOutcome,
    ) -> Result<Statistics, StoreError> {
        let key = user.as_str().to_string();
        self.blocking(move |repo| Ok(repo.record_outcome(&key, outcome)?.statistics()))
            .await
    }

    #[instrument(skip(self, user), fields(user = %user))]
    async fn load_profile(&self, user: &UserId) -> Result<UserProfile, StoreError> {
        let id = user.clone();
        self.blocking(move |repo| {
            let row = repo.get_or_create_user(id.as_str())?;
            Ok(UserProfile::new(id, row.statistics(), row.game_state()?))
        })
        .await
    }
}
