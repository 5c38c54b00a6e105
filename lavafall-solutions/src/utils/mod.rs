//! Shared traversal core
//!
//! - [`grid`]: immutable 2D grid, headings, bordering and rotation
//! - [`visited`]: dedup of composite traversal states and best-cost tracking
//! - [`frontier`]: multi-front beam propagation and pipe-loop tracing
//! - [`crucible`]: Dijkstra over (position, heading, run length)
//! - [`corridor`]: corridor contraction and longest simple path
//! - [`polygon`], [`sequence`]: small numeric helpers

pub mod corridor;
pub mod crucible;
mod error;
pub mod frontier;
pub mod grid;
pub mod polygon;
pub mod sequence;
pub mod visited;

pub use error::{GridError, SearchError};
pub use grid::{Axis, Grid, Heading, Position};
