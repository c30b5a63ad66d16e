//! Move engine error types.

use crate::store::StoreError;
use derive_more::{Display, Error};

/// Failure of a move request.
///
/// The occupied-cell case is not an error; it is reported as
/// [`MoveOutcome::SpotTaken`](super::MoveOutcome::SpotTaken).
#[derive(Debug, Clone, Display, Error)]
pub enum EngineError {
    /// Row or column outside `0..=2`.
    #[display("Invalid input: row {row} and column {column} must each be between 0 and 2")]
    InvalidInput {
        /// Requested row.
        row: i64,
        /// Requested column.
        column: i64,
    },
    /// Difficulty label other than `easy`, `medium` or `hard`.
    #[display("Unknown difficulty '{_0}' (expected easy, medium, or hard)")]
    UnknownDifficulty(#[error(not(source))] String),
    /// The persistence collaborator failed.
    #[display("{_0}")]
    Store(StoreError),
}

impl EngineError {
    /// Returns true for errors caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidInput { .. } | EngineError::UnknownDifficulty(_)
        )
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        EngineError::Store(err)
    }
}
