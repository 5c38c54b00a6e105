use crate::utils::grid::Position;
use lavafall_solver::{ParseError, SolveError};
use thiserror::Error;

/// Error from building or indexing a [`Grid`](crate::utils::Grid)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("position ({}, {}) is outside the {width}x{height} grid", .position.x, .position.y)]
    OutOfBounds {
        position: Position,
        width: usize,
        height: usize,
    },
    /// Row `row` (1-based) has a different length than the first row
    #[error("line {row}: expected {expected} cells, found {found}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("grid input is empty")]
    Empty,
    /// The cell parser rejected a character
    #[error("line {row}, column {column}: unexpected {found:?}")]
    InvalidCell {
        row: usize,
        column: usize,
        found: char,
    },
}

/// Error from one of the traversal searches
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("no start marker in the grid")]
    MissingStart,
    #[error("no pipe loop leads back to the start at ({}, {})", .0.x, .0.y)]
    LoopNotClosed(Position),
    #[error("no path from the start reaches the target")]
    NoPath,
    #[error("invalid run limits {min}..={max}")]
    InvalidRunLimits { min: u8, max: u8 },
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl From<SearchError> for SolveError {
    fn from(error: SearchError) -> Self {
        SolveError::failed(error)
    }
}

impl From<GridError> for SolveError {
    fn from(error: GridError) -> Self {
        SolveError::failed(error)
    }
}

impl From<GridError> for ParseError {
    fn from(error: GridError) -> Self {
        ParseError::InvalidFormat(error.to_string())
    }
}
