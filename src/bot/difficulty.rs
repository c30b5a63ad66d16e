//! Difficulty labels accepted from clients.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Bot difficulty level.
///
/// Parses from exactly `easy`, `medium` or `hard`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    /// Random moves.
    Easy,
    /// Blocks threats and takes strong cells.
    #[default]
    Medium,
    /// Also takes immediate wins.
    Hard,
}
