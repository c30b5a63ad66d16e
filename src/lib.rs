//! Tic-tac-toe against a bot, with per-user statistics.
//!
//! A human plays `X`; the bot answers as `O` at one of three difficulty
//! levels. Each request plays one full turn and the result is persisted
//! per user.
//!
//! # Architecture
//!
//! - **Games**: board, rules, and per-user game state
//! - **Bot**: easy, medium, and hard move selection
//! - **Engine**: validates and plays one turn, then persists it
//! - **Store**: persistence collaborator (in-memory or SQLite)
//! - **Server**: REST API with per-user request serialization
//!
//! # Example
//!
//! ```no_run
//! use tictactoe_bot::{MemoryStore, MoveEngine, MoveRequest, UserId};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let engine = MoveEngine::new(MemoryStore::new());
//! let outcome = engine
//!     .handle_move(&UserId::from("ann@example.com"), "hard", MoveRequest::new(1, 1))
//!     .await?;
//! println!("{}", serde_json::to_string(&outcome)?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod bot;
mod config;
mod db;
mod engine;
mod games;
mod session;
mod store;

// Public so binaries can build the router.
pub mod server;

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{
    Board, BoardError, Cell, GameOutcome, GameState, GameStatus, Mark, Position, Statistics,
};

// Crate-level exports - Bot
pub use bot::{BotStrategy, Difficulty};

// Crate-level exports - Engine
pub use engine::{
    EngineError, MoveEngine, MoveOutcome, MoveRequest, SPOT_TAKEN_MESSAGE, TurnResult,
};

// Crate-level exports - Persistence
pub use db::{DbError, GameRepository, NewUser, User};
pub use store::{GameStore, MemoryStore, StoreError, UserId, UserProfile};

// Crate-level exports - Server plumbing
pub use config::{ConfigError, ServerConfig};
pub use session::{SessionGuard, SessionLocks};
