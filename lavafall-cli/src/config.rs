//! Configuration resolution from CLI args

use crate::cli::{Args, ParallelizeBy};
use crate::error::CliError;
use std::path::{Path, PathBuf};

/// Resolved runtime configuration
#[derive(Debug)]
pub struct Config {
    /// Year filter (None = all years)
    pub year_filter: Option<u16>,
    /// Day filter (None = all days)
    pub day_filter: Option<u8>,
    /// Part filter (None = all parts)
    pub part_filter: Option<u8>,
    /// Tags to filter solvers
    pub tags: Vec<String>,
    /// Input directory, `~` already expanded
    pub input_dir: PathBuf,
    /// Explicit input file for a single puzzle
    pub input_file: Option<PathBuf>,
    pub thread_count: usize,
    pub parallelize_by: ParallelizeBy,
    pub quiet: bool,
    pub verbosity: u8,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self, CliError> {
        let thread_count = match args.threads {
            Some(0) => return Err(CliError::Config("--threads must be at least 1".into())),
            Some(n) => n,
            None => num_cpus(),
        };

        Ok(Config {
            year_filter: args.year,
            day_filter: args.day,
            part_filter: args.part,
            tags: args.tags,
            input_dir: expand_tilde(&args.input_dir),
            input_file: args.input.as_deref().map(expand_tilde),
            thread_count,
            parallelize_by: args.parallelize_by,
            quiet: args.quiet,
            verbosity: args.verbose,
        })
    }

    /// Default log filter when `RUST_LOG` is unset
    pub fn log_directive(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info,lavafall_solutions=debug",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Expand ~ to home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str()
        && (path_str.starts_with("~/") || path_str == "~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path_str.trim_start_matches('~').trim_start_matches('/'));
    }
    path.to_path_buf()
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
