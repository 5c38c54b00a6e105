use crate::utils::Grid;
use crate::utils::crucible::{RunLimits, least_cost};
use glam::IVec2;
use lavafall_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 17, tags = ["grid", "dijkstra"])]
pub struct Solver;

const CRUCIBLE: RunLimits = RunLimits::new(1, 3);
const ULTRA_CRUCIBLE: RunLimits = RunLimits::new(4, 10);

fn heat_loss(city: &Grid<u8>, limits: RunLimits) -> Result<String, SolveError> {
    let factory = IVec2::new(city.width() as i32 - 1, city.height() as i32 - 1);
    let route = least_cost(city, IVec2::ZERO, factory, limits)?;
    Ok(route.cost.to_string())
}

impl AocParser for Solver {
    type SharedData<'a> = Grid<u8>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        Ok(Grid::parse(input, |c| c.to_digit(10).map(|d| d as u8))?)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        heat_loss(shared, CRUCIBLE)
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        heat_loss(shared, ULTRA_CRUCIBLE)
    }
}
