//! Turn orchestration: validate, apply the human move, answer with the bot.

mod error;
mod move_engine;

pub use error::EngineError;
pub use move_engine::{MoveEngine, MoveOutcome, MoveRequest, SPOT_TAKEN_MESSAGE, TurnResult};
