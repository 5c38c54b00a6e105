use crate::utils::corridor::{JunctionGraph, Slopes, Trail};
use crate::utils::{Grid, Position};
use lavafall_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 23, tags = ["graph", "longest-path", "parallel"])]
pub struct Solver;

#[derive(Debug)]
pub struct HikingMap {
    trails: Grid<Trail>,
    start: Position,
    end: Position,
}

impl HikingMap {
    fn longest_hike(&self, slopes: Slopes, workers: usize) -> Result<u32, SolveError> {
        let mut graph = JunctionGraph::contract(&self.trails, self.start, self.end, slopes)?;
        graph.simplify();
        Ok(graph.longest_path(workers)?)
    }
}

/// The single path tile in row `y`
fn gap_in_row(trails: &Grid<Trail>, y: usize) -> Option<Position> {
    let x = trails.row(y)?.iter().position(|&t| t == Trail::Path)?;
    Some(Position::new(x as i32, y as i32))
}

impl AocParser for Solver {
    type SharedData<'a> = HikingMap;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let trails = Grid::parse(input, Trail::from_char)?;
        let start = gap_in_row(&trails, 0)
            .ok_or_else(|| ParseError::MissingData("entrance in the top row".into()))?;
        let end = gap_in_row(&trails, trails.height() - 1)
            .ok_or_else(|| ParseError::MissingData("exit in the bottom row".into()))?;
        Ok(HikingMap { trails, start, end })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.longest_hike(Slopes::Respect, 1)?.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let workers = rayon::current_num_threads();
        Ok(shared.longest_hike(Slopes::Ignore, workers)?.to_string())
    }
}
