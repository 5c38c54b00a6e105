//! Output formatting for solver results

use crate::executor::SolverResult;
use chrono::TimeDelta;
use std::time::{Duration, Instant};

/// Output formatter for solver results
pub struct OutputFormatter {
    quiet: bool,
    start_time: Instant,
}

/// Totals over a finished run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub solved: usize,
    pub failed: usize,
    pub parse_time: TimeDelta,
    pub solve_time: TimeDelta,
}

impl Summary {
    /// Parse time counts once per puzzle even when several parts share it
    pub fn from_results(results: &[SolverResult]) -> Self {
        let solved = results.iter().filter(|r| r.answer.is_ok()).count();
        let parse_time = results
            .iter()
            .filter(|r| r.answer.is_ok())
            .map(|r| ((r.year, r.day), r.parse_duration))
            .collect::<std::collections::BTreeMap<_, _>>()
            .into_values()
            .flatten()
            .sum();
        let solve_time = results
            .iter()
            .filter(|r| r.answer.is_ok())
            .map(|r| r.solve_duration)
            .sum();

        Self {
            solved,
            failed: results.len() - solved,
            parse_time,
            solve_time,
        }
    }

    /// Compute time over wall-clock time
    pub fn speedup(&self, elapsed: Duration) -> Option<f64> {
        if elapsed.is_zero() {
            return None;
        }
        let compute = (self.parse_time + self.solve_time)
            .num_microseconds()
            .unwrap_or(0) as f64
            / 1_000_000.0;
        Some(compute / elapsed.as_secs_f64())
    }
}

impl OutputFormatter {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            start_time: Instant::now(),
        }
    }

    pub fn print_result(&self, result: &SolverResult) {
        if self.quiet {
            match &result.answer {
                Ok(answer) => println!("{}", answer),
                Err(e) => eprintln!("Error: {}", e),
            }
            return;
        }

        let prefix = format!("{}/{:02} Part {}", result.year, result.day, result.part);
        match &result.answer {
            Ok(answer) => println!("{}: {} ({})", prefix, answer, format_timing(result)),
            Err(e) => eprintln!("{}: Error - {}", prefix, e),
        }
    }

    /// Shows both total compute time and actual elapsed wall-clock time
    pub fn print_summary(&self, results: &[SolverResult]) {
        if self.quiet {
            return;
        }

        let summary = Summary::from_results(results);
        let elapsed = self.start_time.elapsed();

        println!();
        println!("--- Summary ---");
        println!("Solvers: {} solved, {} failed", summary.solved, summary.failed);
        println!("Total parse time: {}", format_duration(summary.parse_time));
        println!("Total solve time: {}", format_duration(summary.solve_time));
        println!("Elapsed wall-clock time: {}", format_std_duration(elapsed));
        if let Some(speedup) = summary.speedup(elapsed) {
            println!("Speedup factor: {:.2}x", speedup);
        }
    }
}

fn format_timing(result: &SolverResult) -> String {
    let solve = format_duration(result.solve_duration);
    match result.parse_duration {
        Some(parse) => format!("parse: {}, solve: {}", format_duration(parse), solve),
        None => format!("solve: {}", solve),
    }
}

fn format_duration(d: TimeDelta) -> String {
    let Some(micros) = d.num_microseconds() else {
        return "N/A".to_string();
    };

    if micros < 0 {
        return format!("-{}", format_duration(-d));
    }
    format_micros(micros as u128)
}

fn format_std_duration(d: Duration) -> String {
    format_micros(d.as_micros())
}

fn format_micros(micros: u128) -> String {
    if micros < 1000 {
        format!("{}µs", micros)
    } else if micros < 1_000_000 {
        format!("{:.2}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", micros as f64 / 1_000_000.0)
    }
}
