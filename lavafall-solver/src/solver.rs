//! Core solver traits

use crate::error::{ParseError, SolveError};

/// Turns raw puzzle input into the data every part works from.
///
/// ```
/// use lavafall_solver::{AocParser, ParseError};
///
/// struct HeatMap;
///
/// impl AocParser for HeatMap {
///     type SharedData<'a> = Vec<Vec<u8>>;
///
///     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         input
///             .lines()
///             .map(|row| {
///                 row.chars()
///                     .map(|c| c.to_digit(10).map(|d| d as u8))
///                     .collect::<Option<Vec<_>>>()
///                     .ok_or_else(|| ParseError::InvalidFormat(row.to_string()))
///             })
///             .collect()
///     }
/// }
///
/// assert_eq!(HeatMap::parse("12\n34").unwrap(), vec![vec![1, 2], vec![3, 4]]);
/// ```
pub trait AocParser {
    /// Parsed input plus anything the parts want to cache between them.
    ///
    /// Owned data is the common case; borrow from the input with `'a` when no
    /// transformation is needed.
    type SharedData<'a>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError>;
}

/// Solves part `N` of a puzzle.
///
/// The part number is a const generic so a missing part is a compile error
/// at the `#[derive(AocSolver)]` site rather than a runtime surprise.
///
/// ```
/// use lavafall_solver::{AocParser, PartSolver, ParseError, SolveError};
///
/// struct Maze;
///
/// impl AocParser for Maze {
///     /// Rows borrowed straight from the input
///     type SharedData<'a> = Vec<&'a str>;
///
///     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         Ok(input.lines().collect())
///     }
/// }
///
/// impl PartSolver<1> for Maze {
///     fn solve(rows: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
///         let walls = rows.iter().map(|row| row.matches('#').count()).sum::<usize>();
///         Ok(walls.to_string())
///     }
/// }
///
/// let mut rows = Maze::parse("#.#\n#..").unwrap();
/// assert_eq!(<Maze as PartSolver<1>>::solve(&mut rows).unwrap(), "3");
/// ```
pub trait PartSolver<const N: u8>: AocParser {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError>;
}

/// A complete puzzle solver: parsing plus a runtime part dispatch.
///
/// Usually derived with `#[derive(AocSolver)]`, which forwards
/// `solve_part(shared, n)` to `<Self as PartSolver<n>>::solve`.
pub trait Solver: AocParser {
    /// Number of parts this solver implements
    const PARTS: u8;

    /// Solve `part` against the shared data.
    ///
    /// Returns `SolveError::PartNotImplemented` for a part with no dispatch arm.
    fn solve_part(shared: &mut Self::SharedData<'_>, part: u8) -> Result<String, SolveError>;
}

pub trait SolverExt: Solver {
    /// Like `solve_part`, but rejects part 0 and parts above `PARTS` first.
    fn solve_part_checked_range(
        shared: &mut Self::SharedData<'_>,
        part: u8,
    ) -> Result<String, SolveError> {
        if (1..=Self::PARTS).contains(&part) {
            Self::solve_part(shared, part)
        } else {
            Err(SolveError::PartOutOfRange(part))
        }
    }
}

impl<T: Solver + ?Sized> SolverExt for T {}
