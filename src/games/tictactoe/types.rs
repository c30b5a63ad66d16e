//! Core domain types for tic-tac-toe.

use super::position::Position;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Mark placed on the board.
///
/// The human always plays `X` and the bot always plays `O`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Mark {
    /// The human's mark (moves first).
    X,
    /// The bot's mark.
    O,
}

impl Mark {
    /// Mark used by the human player.
    pub const PLAYER: Mark = Mark::X;
    /// Mark used by the bot.
    pub const BOT: Mark = Mark::O;

    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A cell on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell occupied by a mark.
    Occupied(Mark),
}

impl From<Cell> for Option<Mark> {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => None,
            Cell::Occupied(mark) => Some(mark),
        }
    }
}

impl From<Option<Mark>> for Cell {
    fn from(mark: Option<Mark>) -> Self {
        mark.map_or(Cell::Empty, Cell::Occupied)
    }
}

/// Errors raised when addressing or decoding a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// Position index outside 0-8.
    #[display("Invalid position {_0} (must be 0-8)")]
    InvalidPosition(#[error(not(source))] usize),
    /// Encoded board did not contain exactly nine cells.
    #[display("Board must have 9 cells, got {_0}")]
    WrongLength(#[error(not(source))] usize),
}

/// 3x3 tic-tac-toe board.
///
/// Serialized as an array of nine entries, each `"X"`, `"O"` or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Option<Mark>>", try_from = "Vec<Option<Mark>>")]
pub struct Board {
    /// Cells in row-major order (0-8).
    cells: [Cell; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; 9],
        }
    }

    /// Builds a board from nine cells in row-major order.
    pub fn from_cells(cells: [Cell; 9]) -> Self {
        Self { cells }
    }

    /// Gets the cell at the given position.
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.to_index()]
    }

    /// Checks if a cell holds a mark.
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.get(pos) != Cell::Empty
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        !self.is_occupied(pos)
    }

    /// Writes `mark` into `pos`.
    ///
    /// # Panics
    ///
    /// Panics if the cell is already occupied. Callers check
    /// [`Board::is_occupied`] first; overwriting a mark is a logic error.
    #[instrument(skip(self))]
    pub fn place(&mut self, pos: Position, mark: Mark) {
        assert!(
            self.is_empty(pos),
            "attempted to place {mark} on occupied cell {pos}"
        );
        self.cells[pos.to_index()] = Cell::Occupied(mark);
    }

    /// Returns all cells as a slice.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Returns every empty position in board order.
    pub fn empty_positions(&self) -> Vec<Position> {
        Position::ALL
            .iter()
            .copied()
            .filter(|pos| self.is_empty(*pos))
            .collect()
    }

    /// Counts occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| **c != Cell::Empty).count()
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.cells[pos] {
                    Cell::Empty => (pos + 1).to_string(),
                    Cell::Occupied(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Board> for Vec<Option<Mark>> {
    fn from(board: Board) -> Self {
        board.cells.iter().map(|&c| c.into()).collect()
    }
}

impl TryFrom<Vec<Option<Mark>>> for Board {
    type Error = BoardError;

    fn try_from(marks: Vec<Option<Mark>>) -> Result<Self, Self::Error> {
        let len = marks.len();
        let marks: [Option<Mark>; 9] = marks
            .try_into()
            .map_err(|_| BoardError::WrongLength(len))?;
        Ok(Self {
            cells: marks.map(Cell::from),
        })
    }
}
