use crate::utils::sequence::{extrapolate_next, extrapolate_previous};
use anyhow::anyhow;
use lavafall_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 9, tags = ["sequence"])]
pub struct Solver;

impl AocParser for Solver {
    type SharedData<'a> = Vec<Vec<i64>>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        input
            .trim()
            .lines()
            .enumerate()
            .map(|(line_idx, line)| {
                line.split_whitespace()
                    .map(str::parse::<i64>)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| anyhow!("(line {}) {}", line_idx + 1, e))
            })
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(|e| ParseError::InvalidFormat(e.to_string()))
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared
            .iter()
            .map(|history| extrapolate_next(history))
            .sum::<i64>()
            .to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared
            .iter()
            .map(|history| extrapolate_previous(history))
            .sum::<i64>()
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::year_2023::solve_example;

    const EXAMPLE: &str = "0 3 6 9 12 15
1 3 6 10 15 21
10 13 16 21 30 45";

    #[test]
    fn test_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 1), "114");
        assert_eq!(solve_example::<Solver>(EXAMPLE, 2), "2");
    }

    #[test]
    fn test_bad_number_reports_line() {
        let err = Solver::parse("1 2 3\n4 x 6").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
