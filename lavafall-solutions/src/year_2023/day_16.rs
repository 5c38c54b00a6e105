use crate::utils::frontier::{BeamState, BeamTile, energize};
use crate::utils::{Grid, GridError, Heading};
use glam::IVec2;
use lavafall_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};
use rayon::prelude::*;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 16, tags = ["grid", "beam"])]
pub struct Solver;

fn energized_from(contraption: &Grid<BeamTile>, start: BeamState) -> Result<usize, GridError> {
    energize(contraption, start, |tile, heading| tile.deflect(heading)).map(|lit| lit.cell_count())
}

/// Every way a beam can enter from outside, pointing inwards
fn edge_entries(contraption: &Grid<BeamTile>) -> Vec<BeamState> {
    let (width, height) = (contraption.width() as i32, contraption.height() as i32);
    let columns = (0..width).flat_map(|x| {
        [
            BeamState::new(IVec2::new(x, 0), Heading::Down),
            BeamState::new(IVec2::new(x, height - 1), Heading::Up),
        ]
    });
    let rows = (0..height).flat_map(|y| {
        [
            BeamState::new(IVec2::new(0, y), Heading::Right),
            BeamState::new(IVec2::new(width - 1, y), Heading::Left),
        ]
    });
    columns.chain(rows).collect()
}

impl AocParser for Solver {
    type SharedData<'a> = Grid<BeamTile>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        Ok(Grid::parse(input, BeamTile::from_char)?)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let start = BeamState::new(IVec2::ZERO, Heading::Right);
        Ok(energized_from(shared, start)?.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let contraption = &*shared;
        let best = edge_entries(contraption)
            .into_par_iter()
            .map(|start| energized_from(contraption, start))
            .try_reduce(|| 0, |a, b| Ok(a.max(b)))?;
        Ok(best.to_string())
    }
}
