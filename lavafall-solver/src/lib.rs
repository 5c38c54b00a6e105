//! Puzzle solver framework
//!
//! Each puzzle is a unit type implementing [`AocParser`] (input → shared
//! data) and one [`PartSolver<N>`] per part. `#[derive(AocSolver)]` turns those
//! into a [`Solver`] with runtime part dispatch, and
//! `#[derive(AutoRegisterSolver)]` makes the solver discoverable by
//! [`SolverRegistryBuilder::register_all_plugins`].
//!
//! # Example
//!
//! ```
//! use lavafall_solver::{AocParser, AocSolver, ParseError, PartSolver, SolveError, SolverRegistryBuilder};
//!
//! #[derive(AocSolver)]
//! #[aoc_solver(max_parts = 2)]
//! struct Day1;
//!
//! impl AocParser for Day1 {
//!     type SharedData<'a> = Vec<i64>;
//!
//!     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
//!         input
//!             .lines()
//!             .map(|l| l.parse().map_err(|_| ParseError::InvalidFormat(l.to_string())))
//!             .collect()
//!     }
//! }
//!
//! impl PartSolver<1> for Day1 {
//!     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
//!         Ok(shared.iter().sum::<i64>().to_string())
//!     }
//! }
//!
//! impl PartSolver<2> for Day1 {
//!     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
//!         Ok(shared.iter().product::<i64>().to_string())
//!     }
//! }
//!
//! let registry = SolverRegistryBuilder::new()
//!     .register_solver::<Day1>(2023, 1)
//!     .unwrap()
//!     .build();
//!
//! let mut solver = registry.create_solver(2023, 1, "2\n3\n4").unwrap();
//! assert_eq!(solver.solve(1).unwrap().answer, "9");
//! assert_eq!(solver.solve(2).unwrap().answer, "24");
//! ```

mod error;
mod instance;
mod registry;
mod solver;

pub use error::{ParseError, RegistrationError, SolveError, SolverError};
pub use instance::{DynSolver, SolveResult, SolverInstance};
pub use registry::{
    FactoryInfo, PuzzleId, RegisterableSolver, SolverFactory, SolverPlugin, SolverRegistry,
    SolverRegistryBuilder, DAYS_PER_YEAR, FIRST_YEAR, LAST_YEAR,
};
pub use solver::{AocParser, PartSolver, Solver, SolverExt};

// Used by the code `AutoRegisterSolver` expands to
pub use inventory;

pub use lavafall_solver_macros::{AocSolver, AutoRegisterSolver};
