//! Error types for the CLI

use std::path::PathBuf;
use thiserror::Error;
use thiserror_ext::Arc as ArcDerive;

/// Main CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Registration error: {0}")]
    Registration(#[from] lavafall_solver::RegistrationError),

    /// Executor error (wraps Arc for cheap cloning)
    #[error("{0}")]
    Executor(#[from] ArcExecutorError),
}

/// Executor-specific errors
#[derive(Error, Debug, ArcDerive)]
#[thiserror_ext(newtype(name = ArcExecutorError))]
pub enum ExecutorError {
    /// Input could not be read
    #[error("Input unavailable for {year}/{day}: {source}")]
    InputUnavailable {
        year: u16,
        day: u8,
        #[source]
        source: InputError,
    },

    #[error("Channel send error")]
    ChannelSend,

    #[error("Thread pool creation failed: {0}")]
    ThreadPool(String),

    /// Multiple errors collected during parallel execution
    #[error("Multiple errors occurred ({} total)", .0.len())]
    Multiple(Vec<ArcExecutorError>),
}

impl ArcExecutorError {
    /// Combine two errors, flattening any `Multiple` on either side so the
    /// result is one level deep and keeps `first`'s errors ahead of `second`'s
    pub fn combine(first: ArcExecutorError, second: ArcExecutorError) -> ArcExecutorError {
        let errors = match (first.inner(), second.inner()) {
            (ExecutorError::Multiple(v1), ExecutorError::Multiple(v2)) => {
                let mut combined = v1.clone();
                combined.extend(v2.iter().cloned());
                combined
            }
            (_, ExecutorError::Multiple(v)) => {
                let mut combined = vec![first];
                combined.extend(v.iter().cloned());
                combined
            }
            (ExecutorError::Multiple(v), _) => {
                let mut combined = v.clone();
                combined.push(second);
                combined
            }
            _ => vec![first, second],
        };
        ExecutorError::Multiple(errors).into()
    }

    /// Combine an optional error with a new error
    pub fn combine_opt(
        existing: Option<ArcExecutorError>,
        new: ArcExecutorError,
    ) -> ArcExecutorError {
        match existing {
            Some(e) => Self::combine(e, new),
            None => new,
        }
    }
}

/// Errors reading puzzle inputs
#[derive(Error, Debug)]
pub enum InputError {
    #[error("no input file at {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
