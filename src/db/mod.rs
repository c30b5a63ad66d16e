//! SQLite persistence for user statistics and in-progress games.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::DbError;
pub use models::{NewUser, User};
pub use repository::GameRepository;
