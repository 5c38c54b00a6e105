//! Puzzle solvers with automatic registration
//!
//! `utils` holds the traversal core every grid puzzle builds on: the grid
//! model, visited-state bookkeeping, the beam/loop frontier walker, the
//! run-limited shortest-path search and corridor contraction with
//! longest-path search. Solvers live under one module per year and register
//! themselves through `#[derive(AutoRegisterSolver)]`, so linking this crate
//! is enough for `SolverRegistryBuilder::register_all_plugins` to find them.

pub mod utils;

#[cfg(feature = "year-2023")]
pub mod year_2023;
