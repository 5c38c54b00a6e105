//! Error types shared by every solver

use thiserror::Error;

/// Error raised while turning raw puzzle text into shared data
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    /// Input doesn't have the expected shape
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    /// A marker or section the solver needs is absent
    #[error("Missing data: {0}")]
    MissingData(String),
    /// Anything else
    #[error("Parse error: {0}")]
    Other(String),
}

/// Error raised while solving one part
#[derive(Debug, Error)]
pub enum SolveError {
    /// The solver has no implementation for this part
    #[error("Part {0} is not implemented")]
    PartNotImplemented(u8),
    /// The part number is 0 or above the solver's part count
    #[error("Part {0} is out of range")]
    PartOutOfRange(u8),
    /// The computation itself failed (no path, unclosed loop, ...)
    #[error("Solve failed: {0}")]
    SolveFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SolveError {
    /// Wrap any error as a failed solve
    pub fn failed<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        SolveError::SolveFailed(Box::new(error))
    }
}

/// Error from looking up, parsing or solving through the registry
#[derive(Debug, Error)]
pub enum SolverError {
    /// No solver registered for the puzzle
    #[error("Solver not found for year {0} day {1}")]
    NotFound(u16, u8),
    /// Year or day can never name a puzzle
    #[error("Invalid puzzle: year {0} day {1}")]
    InvalidYearDay(u16, u8),
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),
    #[error("Solve error: {0}")]
    SolveError(#[from] SolveError),
}

/// Error from building a registry
#[derive(Debug, Clone, Error)]
pub enum RegistrationError {
    /// Two solvers claim the same puzzle
    #[error("Duplicate solver registration for year {0} day {1}")]
    DuplicateSolver(u16, u8),
    /// Year or day outside the supported range
    #[error("Invalid puzzle: year {0} day {1}")]
    InvalidYearDay(u16, u8),
}
