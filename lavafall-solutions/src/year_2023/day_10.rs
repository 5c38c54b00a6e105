use crate::utils::Grid;
use crate::utils::frontier::{Pipe, PipeLoop};
use lavafall_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 10, tags = ["grid", "loop"])]
pub struct Solver;

#[derive(Debug)]
pub struct SharedData {
    pipes: Grid<Pipe>,
    pipe_loop: Option<PipeLoop>,
}

impl AocParser for Solver {
    type SharedData<'a> = SharedData;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let pipes = Grid::parse(input, Pipe::from_char)?.with_border(Pipe::Ground);
        Ok(SharedData {
            pipes,
            pipe_loop: None,
        })
    }
}

fn trace_once(shared: &mut SharedData) -> Result<&PipeLoop, SolveError> {
    let pipe_loop = match shared.pipe_loop.take() {
        Some(pipe_loop) => pipe_loop,
        None => PipeLoop::trace(&shared.pipes)?,
    };
    Ok(shared.pipe_loop.insert(pipe_loop))
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(trace_once(shared)?.farthest().to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(trace_once(shared)?.enclosed_tiles().to_string())
    }
}
