use crate::utils::Grid;
use anyhow::anyhow;
use lavafall_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 13, tags = ["grid", "mirror"])]
pub struct Solver;

/// Rows above the horizontal mirror line whose halves differ in exactly
/// `smudges` cells
fn mirror_row(pattern: &Grid<bool>, smudges: usize) -> Option<usize> {
    let rows: Vec<&[bool]> = pattern.rows().collect();
    (1..rows.len()).find(|&split| {
        let above = rows[..split].iter().rev();
        let below = rows[split..].iter();
        let differences: usize = above
            .zip(below)
            .map(|(a, b)| a.iter().zip(b.iter()).filter(|(x, y)| x != y).count())
            .sum();
        differences == smudges
    })
}

/// `100 * rows above` for a horizontal line, `columns left` for a vertical one
fn summarize(pattern: &Grid<bool>, smudges: usize) -> Result<usize, SolveError> {
    if let Some(rows) = mirror_row(pattern, smudges) {
        return Ok(100 * rows);
    }
    // Columns become rows, left to right becomes top to bottom
    mirror_row(&pattern.rotated(true), smudges)
        .ok_or_else(|| SolveError::failed(ParseError::MissingData("pattern has no mirror".into())))
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Grid<bool>>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        input
            .trim()
            .replace("\r\n", "\n")
            .split("\n\n")
            .enumerate()
            .map(|(idx, block)| {
                Grid::parse(block, |c| match c {
                    '#' => Some(true),
                    '.' => Some(false),
                    _ => None,
                })
                .map_err(|e| anyhow!("(pattern {}) {}", idx + 1, e))
            })
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(|e| ParseError::InvalidFormat(e.to_string()))
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared
            .iter()
            .map(|pattern| summarize(pattern, 0))
            .sum::<Result<usize, _>>()
            .map(|total| total.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared
            .iter()
            .map(|pattern| summarize(pattern, 1))
            .sum::<Result<usize, _>>()
            .map(|total| total.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::year_2023::solve_example;

    const EXAMPLE: &str = "\
#.##..##.
..#.##.#.
##......#
##......#
..#.##.#.
..##..##.
#.#.##.#.

#...##..#
#....#..#
..##..###
#####.##.
#####.##.
..##..###
#....#..#";

    #[test]
    fn test_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 1), "405");
        assert_eq!(solve_example::<Solver>(EXAMPLE, 2), "400");
    }

    #[test]
    fn test_vertical_line_found_through_rotation() {
        let patterns = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(mirror_row(&patterns[0], 0), None);
        assert_eq!(summarize(&patterns[0], 0).unwrap(), 5);
        assert_eq!(summarize(&patterns[1], 0).unwrap(), 400);
    }
}
