//! lavafall - command-line runner for the grid and graph puzzle solvers

mod aggregator;
mod cli;
mod config;
mod error;
mod executor;
mod inputs;
mod output;

// Link the solutions crate so its solver plugins get collected
use lavafall_solutions as _;

use clap::Parser;
use cli::Args;
use config::Config;
use error::CliError;
use executor::Executor;
use lavafall_solver::{SolverRegistry, SolverRegistryBuilder};
use output::OutputFormatter;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{e}");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<(), CliError> {
    let config = Config::from_args(args)?;
    init_tracing(&config);
    tracing::debug!(?config, "resolved configuration");

    let registry = build_registry(&config.tags)?;
    tracing::info!(solvers = registry.len(), "registry built");

    let executor =
        Executor::new(registry, &config).map_err(|e| CliError::Config(e.to_string()))?;

    let work_items = executor.collect_work_items();
    if work_items.is_empty() {
        println!("No solvers found matching the specified filters.");
        return Ok(());
    }

    let missing: Vec<_> = work_items
        .iter()
        .filter(|w| !executor.inputs().contains(w.year, w.day))
        .collect();
    for w in &missing {
        tracing::warn!(
            path = %executor.inputs().path(w.year, w.day).display(),
            "missing input for {}/{:02}",
            w.year,
            w.day
        );
    }

    run_executor(executor, work_items, config.quiet)
}

fn run_executor(
    executor: Executor,
    work_items: Vec<executor::WorkItem>,
    quiet: bool,
) -> Result<(), CliError> {
    if !quiet {
        println!("Running {} solver(s)...", work_items.len());
    }

    let expected_keys: Vec<aggregator::ResultKey> = work_items
        .iter()
        .flat_map(|w| {
            w.parts.clone().map(move |p| aggregator::ResultKey {
                year: w.year,
                day: w.day,
                part: p,
            })
        })
        .collect();

    let (tx, rx) = std::sync::mpsc::channel();
    let executor_handle = std::thread::spawn(move || executor.execute(tx));

    // Print results in order as they become ready
    let formatter = OutputFormatter::new(quiet);
    let mut aggregator = aggregator::ResultAggregator::new(expected_keys);
    let mut results = Vec::new();

    for result in rx {
        for ready in aggregator.add(result) {
            formatter.print_result(&ready);
            results.push(ready);
        }
    }

    for ready in aggregator.drain() {
        formatter.print_result(&ready);
        results.push(ready);
    }

    if !aggregator.is_complete() {
        tracing::warn!("not all expected results were received");
    }

    executor_handle
        .join()
        .map_err(|_| CliError::Config("Executor thread panicked".to_string()))?
        .map_err(CliError::Executor)?;

    formatter.print_summary(&results);

    Ok(())
}

/// Every tag given on the command line must be on the solver
fn build_registry(tags: &[String]) -> Result<SolverRegistry, CliError> {
    let builder = SolverRegistryBuilder::new();

    let builder = if tags.is_empty() {
        builder.register_all_plugins()?
    } else {
        builder.register_solver_plugins(|plugin| {
            tags.iter().all(|tag| plugin.tags.contains(&tag.as_str()))
        })?
    };

    Ok(builder.build())
}
