//! Parallel executor for running solvers

use crate::cli::ParallelizeBy;
use crate::config::Config;
use crate::error::{ArcExecutorError, ExecutorError};
use crate::inputs::InputStore;
use chrono::TimeDelta;
use itertools::Itertools;
use lavafall_solver::{SolverError, SolverRegistry};
use rayon::prelude::*;
use std::ops::RangeInclusive;
use std::sync::mpsc::Sender;

/// Result from a single solver execution
#[derive(Debug)]
pub struct SolverResult {
    pub year: u16,
    pub day: u8,
    pub part: u8,
    pub answer: Result<String, SolverError>,
    pub solve_duration: TimeDelta,
    /// `None` when the input never got parsed
    pub parse_duration: Option<TimeDelta>,
}

impl SolverResult {
    fn failed(year: u16, day: u8, part: u8, error: SolverError) -> Self {
        Self {
            year,
            day,
            part,
            answer: Err(error),
            solve_duration: TimeDelta::zero(),
            parse_duration: None,
        }
    }
}

/// Work item representing a solver to execute
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub year: u16,
    pub day: u8,
    pub parts: RangeInclusive<u8>,
}

/// What the worker threads share
struct SharedContext {
    registry: SolverRegistry,
    inputs: InputStore,
    parallelize_by: ParallelizeBy,
}

/// Parallel executor for running solvers
pub struct Executor {
    context: SharedContext,
    year_filter: Option<u16>,
    day_filter: Option<u8>,
    part_filter: Option<u8>,
    thread_pool: rayon::ThreadPool,
}

impl Executor {
    pub fn new(registry: SolverRegistry, config: &Config) -> Result<Self, ExecutorError> {
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.thread_count)
            .build()
            .map_err(|e| ExecutorError::ThreadPool(e.to_string()))?;

        Ok(Self {
            context: SharedContext {
                registry,
                inputs: InputStore::new(config.input_dir.clone(), config.input_file.clone()),
                parallelize_by: config.parallelize_by,
            },
            year_filter: config.year_filter,
            day_filter: config.day_filter,
            part_filter: config.part_filter,
            thread_pool,
        })
    }

    pub fn inputs(&self) -> &InputStore {
        &self.context.inputs
    }

    /// Collect work items by filtering from registry metadata
    pub fn collect_work_items(&self) -> Vec<WorkItem> {
        self.context
            .registry
            .iter_info()
            .filter(|info| self.year_filter.is_none_or(|y| info.year == y))
            .filter(|info| self.day_filter.is_none_or(|d| info.day == d))
            .map(|info| WorkItem {
                year: info.year,
                day: info.day,
                parts: filter_parts(self.part_filter, info.parts),
            })
            .filter(|w| !w.parts.is_empty())
            .collect()
    }

    /// Execute all work items and send results to channel
    pub fn execute(&self, tx: Sender<SolverResult>) -> Result<(), ArcExecutorError> {
        let work_items = self.collect_work_items();
        tracing::info!(
            solvers = work_items.len(),
            mode = ?self.context.parallelize_by,
            threads = self.thread_pool.current_num_threads(),
            "executing"
        );

        match self.context.parallelize_by {
            ParallelizeBy::Sequential => {
                let mut collected_error: Option<ArcExecutorError> = None;
                for work in work_items {
                    if let Err(e) = run_work_item(&work, &tx, &self.context) {
                        collected_error = Some(ArcExecutorError::combine_opt(collected_error, e));
                    }
                }
                collected_error.map_or(Ok(()), Err)
            }
            ParallelizeBy::Year => {
                let by_year: Vec<Vec<WorkItem>> = work_items
                    .into_iter()
                    .chunk_by(|w| w.year)
                    .into_iter()
                    .map(|(_, group)| group.collect())
                    .collect();

                self.execute_parallel_grouped(by_year, &tx)
            }
            // Part differs only inside run_work_item
            ParallelizeBy::Day | ParallelizeBy::Part => {
                let singles = work_items.into_iter().map(|w| vec![w]).collect();
                self.execute_parallel_grouped(singles, &tx)
            }
        }
    }

    /// Run groups in parallel, the items of one group in order
    fn execute_parallel_grouped(
        &self,
        groups: Vec<Vec<WorkItem>>,
        tx: &Sender<SolverResult>,
    ) -> Result<(), ArcExecutorError> {
        let context = &self.context;

        self.thread_pool.install(|| {
            groups
                .into_par_iter()
                .map(|items| {
                    let mut err = None;
                    for work in items {
                        if let Err(e) = run_work_item(&work, tx, context) {
                            err = Some(ArcExecutorError::combine_opt(err, e))
                        }
                    }
                    err
                })
                .reduce_with(|err1, err2| match (err1, err2) {
                    (Some(a), Some(b)) => Some(ArcExecutorError::combine(a, b)),
                    (a, b) => a.or(b),
                })
                .flatten()
                .map_or(Ok(()), Err)
        })
    }
}

/// Parts to run given the part filter and the solver's part count
#[allow(clippy::reversed_empty_ranges)]
fn filter_parts(part_filter: Option<u8>, max_parts: u8) -> RangeInclusive<u8> {
    match part_filter {
        Some(p) if p <= max_parts => p..=p,
        Some(_) => 1..=0,
        None => 1..=max_parts,
    }
}

/// Copy of a registry error for reporting against every part
fn duplicate(error: &SolverError) -> SolverError {
    match error {
        SolverError::NotFound(year, day) => SolverError::NotFound(*year, *day),
        SolverError::InvalidYearDay(year, day) => SolverError::InvalidYearDay(*year, *day),
        SolverError::ParseError(e) => SolverError::ParseError(e.clone()),
        SolverError::SolveError(e) => {
            SolverError::ParseError(lavafall_solver::ParseError::Other(e.to_string()))
        }
    }
}

fn send(tx: &Sender<SolverResult>, result: SolverResult) -> Result<(), ArcExecutorError> {
    tx.send(result)
        .map_err(|_| ExecutorError::ChannelSend.into())
}

fn run_work_item(
    work: &WorkItem,
    tx: &Sender<SolverResult>,
    context: &SharedContext,
) -> Result<(), ArcExecutorError> {
    let (year, day) = (work.year, work.day);

    let input = match context.inputs.get(year, day) {
        Ok(input) => input,
        Err(source) => {
            let error = ExecutorError::InputUnavailable { year, day, source };
            tracing::warn!(year, day, "{error}");
            let message = error.to_string();
            for part in work.parts.clone() {
                let missing = lavafall_solver::ParseError::MissingData(message.clone());
                send(tx, SolverResult::failed(year, day, part, missing.into()))?;
            }
            return Ok(());
        }
    };

    if matches!(context.parallelize_by, ParallelizeBy::Part) {
        run_parts_parallel(work, &input, tx, context)
    } else {
        run_parts_sequential(work, &input, tx, context)
    }
}

/// Parse once, then solve the parts in order against the same instance
fn run_parts_sequential(
    work: &WorkItem,
    input: &str,
    tx: &Sender<SolverResult>,
    context: &SharedContext,
) -> Result<(), ArcExecutorError> {
    let (year, day) = (work.year, work.day);

    let mut solver = match context.registry.create_solver(year, day, input) {
        Ok(solver) => solver,
        Err(error) => {
            tracing::warn!(year, day, "{error}");
            for part in work.parts.clone() {
                send(tx, SolverResult::failed(year, day, part, duplicate(&error)))?;
            }
            return Ok(());
        }
    };

    let parse_duration = solver.parse_duration();
    for part in work.parts.clone() {
        let result = match solver.solve(part) {
            Ok(solved) => SolverResult {
                year,
                day,
                part,
                solve_duration: solved.duration(),
                answer: Ok(solved.answer),
                parse_duration: Some(parse_duration),
            },
            Err(error) => SolverResult {
                parse_duration: Some(parse_duration),
                ..SolverResult::failed(year, day, part, error.into())
            },
        };
        send(tx, result)?;
    }
    Ok(())
}

/// Each part parses its own copy of the input so parts can run concurrently
fn run_parts_parallel(
    work: &WorkItem,
    input: &str,
    tx: &Sender<SolverResult>,
    context: &SharedContext,
) -> Result<(), ArcExecutorError> {
    let (year, day) = (work.year, work.day);

    let mut results: Vec<SolverResult> = work
        .parts
        .clone()
        .into_par_iter()
        .map(|part| {
            let single = WorkItem {
                year,
                day,
                parts: part..=part,
            };
            let (part_tx, part_rx) = std::sync::mpsc::channel();
            // The receiver lives until collected, so sends cannot fail here
            let _ = run_parts_sequential(&single, input, &part_tx, context);
            drop(part_tx);
            part_rx.into_iter().collect::<Vec<_>>()
        })
        .flatten()
        .collect();

    results.sort_by_key(|r| r.part);
    for result in results {
        send(tx, result)?;
    }
    Ok(())
}
