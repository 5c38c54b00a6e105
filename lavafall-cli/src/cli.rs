//! CLI argument parsing using clap

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Parallelization level for solver execution
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum ParallelizeBy {
    /// No parallelization; execute all solvers sequentially in order
    Sequential,
    /// Parallelize across years; days and parts run sequentially within each year
    Year,
    /// Parallelize across year/day combinations; parts run sequentially (default)
    #[default]
    Day,
    /// Parallelize across all year/day/part combinations
    Part,
}

/// Grid and graph puzzle runner
#[derive(Parser, Debug)]
#[command(name = "lavafall", about = "Run the grid and graph puzzle solvers", version)]
pub struct Args {
    /// Year to run (runs all years if omitted)
    #[arg(short, long)]
    pub year: Option<u16>,

    /// Day to run (runs all days if omitted)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=25))]
    pub day: Option<u8>,

    /// Part to run (runs all parts if omitted)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub part: Option<u8>,

    /// Tags to filter solvers (comma-separated, all must match)
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Directory holding `{year}_day{day:02}.txt` puzzle inputs
    #[arg(long, default_value = "~/.cache/lavafall/inputs")]
    pub input_dir: PathBuf,

    /// Read the input for the selected puzzle from this file instead
    #[arg(long, requires = "day")]
    pub input: Option<PathBuf>,

    /// Number of threads for parallel execution
    #[arg(long)]
    pub threads: Option<usize>,

    /// Parallelization level: sequential, year, day, or part
    #[arg(long, value_enum, default_value = "day")]
    pub parallelize_by: ParallelizeBy,

    /// Quiet mode - only output answers
    #[arg(short, long)]
    pub quiet: bool,

    /// More diagnostics on stderr; repeat for more (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
