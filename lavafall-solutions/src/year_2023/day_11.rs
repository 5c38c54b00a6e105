use crate::utils::{Grid, Position};
use itertools::Itertools;
use lavafall_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 11, tags = ["grid"])]
pub struct Solver;

#[derive(Debug)]
pub struct Image {
    galaxies: Vec<Position>,
    /// Prefix counts of empty columns / rows: `empty_columns[x]` is how many
    /// empty columns lie left of `x`
    empty_columns: Vec<u64>,
    empty_rows: Vec<u64>,
}

fn empty_before<'g, I, L>(lines: I) -> Vec<u64>
where
    I: Iterator<Item = L>,
    L: IntoIterator<Item = &'g bool>,
{
    lines
        .scan(0, |empty, line| {
            let before = *empty;
            if !line.into_iter().any(|&galaxy| galaxy) {
                *empty += 1;
            }
            Some(before)
        })
        .collect()
}

impl Image {
    /// Sum of pairwise distances after every empty row and column grows to
    /// `factor` copies of itself
    pub fn distances(&self, factor: u64) -> u64 {
        let grow = factor.saturating_sub(1);
        let expanded: Vec<(u64, u64)> = self
            .galaxies
            .iter()
            .map(|g| {
                let (x, y) = (g.x as usize, g.y as usize);
                (
                    x as u64 + self.empty_columns[x] * grow,
                    y as u64 + self.empty_rows[y] * grow,
                )
            })
            .collect();

        expanded
            .iter()
            .tuple_combinations()
            .map(|(a, b)| a.0.abs_diff(b.0) + a.1.abs_diff(b.1))
            .sum()
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Image;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let sky = Grid::parse(input, |c| match c {
            '#' => Some(true),
            '.' => Some(false),
            _ => None,
        })?;

        let galaxies: Vec<_> = sky
            .iter()
            .filter(|&(_, &galaxy)| galaxy)
            .map(|(pos, _)| pos)
            .collect();
        if galaxies.is_empty() {
            return Err(ParseError::MissingData("no galaxies".into()));
        }

        Ok(Image {
            galaxies,
            empty_columns: empty_before((0..sky.width()).map(|x| sky.column(x))),
            empty_rows: empty_before(sky.rows()),
        })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.distances(2).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.distances(1_000_000).to_string())
    }
}
