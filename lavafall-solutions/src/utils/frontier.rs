//! Unweighted frontier walks over a grid
//!
//! Two flavours share the same shape, a cursor stepping cell by cell with a
//! terrain rule deciding where it goes next:
//!
//! - [`energize`] runs any number of beam fronts that split and die out
//! - [`PipeLoop::trace`] follows one front around a closed pipe loop

use crate::utils::error::{GridError, SearchError};
use crate::utils::grid::{Axis, Grid, Heading, Position};
use crate::utils::polygon;
use crate::utils::visited::StateSet;
use std::collections::HashSet;

/// A front about to enter `position` while travelling along `heading`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BeamState {
    pub position: Position,
    pub heading: Heading,
}

impl BeamState {
    pub fn new(position: Position, heading: Heading) -> Self {
        Self { position, heading }
    }
}

/// What a beam crossing a cell is deduplicated on.
///
/// Straight and splitting cells behave the same for both headings along an
/// axis, so the axis is enough. Mirrors send each incoming heading somewhere
/// different and need the outgoing heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Crossing {
    Axis(Axis),
    Heading(Heading),
}

/// Outcome of a beam entering a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deflection {
    pub first: Heading,
    /// Heading of the extra front a splitter spawns
    pub second: Option<Heading>,
    pub crossing: Crossing,
}

impl Deflection {
    /// Carry straight on
    pub fn pass(heading: Heading) -> Self {
        Self {
            first: heading,
            second: None,
            crossing: Crossing::Axis(heading.axis()),
        }
    }

    /// Leave along a new heading, keyed on that heading
    pub fn reflect(heading: Heading) -> Self {
        Self {
            first: heading,
            second: None,
            crossing: Crossing::Heading(heading),
        }
    }

    /// Split into two fronts; keyed on the incoming axis
    pub fn split(incoming: Heading, [first, second]: [Heading; 2]) -> Self {
        Self {
            first,
            second: Some(second),
            crossing: Crossing::Axis(incoming.axis()),
        }
    }
}

/// Contraption tiles: empty space, two mirrors and two splitters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BeamTile {
    Empty,
    /// `/`
    MirrorForward,
    /// `\`
    MirrorBackward,
    /// `|`
    SplitVertical,
    /// `-`
    SplitHorizontal,
}

impl BeamTile {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(BeamTile::Empty),
            '/' => Some(BeamTile::MirrorForward),
            '\\' => Some(BeamTile::MirrorBackward),
            '|' => Some(BeamTile::SplitVertical),
            '-' => Some(BeamTile::SplitHorizontal),
            _ => None,
        }
    }

    pub fn deflect(self, heading: Heading) -> Deflection {
        use Heading::*;

        match (self, heading) {
            (BeamTile::Empty, _) => Deflection::pass(heading),
            (BeamTile::MirrorForward, Up) => Deflection::reflect(Right),
            (BeamTile::MirrorForward, Right) => Deflection::reflect(Up),
            (BeamTile::MirrorForward, Down) => Deflection::reflect(Left),
            (BeamTile::MirrorForward, Left) => Deflection::reflect(Down),
            (BeamTile::MirrorBackward, Up) => Deflection::reflect(Left),
            (BeamTile::MirrorBackward, Left) => Deflection::reflect(Up),
            (BeamTile::MirrorBackward, Down) => Deflection::reflect(Right),
            (BeamTile::MirrorBackward, Right) => Deflection::reflect(Down),
            (BeamTile::SplitVertical, Up | Down) | (BeamTile::SplitHorizontal, Left | Right) => {
                Deflection::pass(heading)
            }
            (BeamTile::SplitVertical, Left | Right) => Deflection::split(heading, [Up, Down]),
            (BeamTile::SplitHorizontal, Up | Down) => Deflection::split(heading, [Left, Right]),
        }
    }
}

/// Everything a beam walk touched
#[derive(Debug, Clone)]
pub struct Energized {
    crossings: StateSet<(Position, Crossing)>,
}

impl Energized {
    /// Distinct cells at least one front passed through
    pub fn positions(&self) -> HashSet<Position> {
        self.crossings.iter().map(|&(pos, _)| pos).collect()
    }

    pub fn cell_count(&self) -> usize {
        self.positions().len()
    }

    /// Distinct `(cell, crossing)` states expanded
    pub fn state_count(&self) -> usize {
        self.crossings.len()
    }
}

/// Propagate beams from `start` until every front has left the grid or
/// repeated a crossing.
///
/// The start cell itself is entered first, so a beam that exits straight
/// away still energizes it. A start outside the grid energizes nothing.
///
/// ```
/// use glam::IVec2;
/// use lavafall_solutions::utils::Grid;
/// use lavafall_solutions::utils::Heading;
/// use lavafall_solutions::utils::frontier::{energize, BeamState, BeamTile};
///
/// let grid = Grid::parse(".\\\n..", BeamTile::from_char).unwrap();
/// let start = BeamState::new(IVec2::ZERO, Heading::Right);
/// let lit = energize(&grid, start, |tile, heading| tile.deflect(heading)).unwrap();
/// assert_eq!(lit.cell_count(), 3);
/// ```
#[tracing::instrument(level = "trace", skip_all, fields(start = ?start))]
pub fn energize<T, R>(grid: &Grid<T>, start: BeamState, rule: R) -> Result<Energized, GridError>
where
    R: Fn(&T, Heading) -> Deflection,
{
    let mut crossings = StateSet::new();
    let mut fronts = vec![start];

    while !fronts.is_empty() {
        for i in (0..fronts.len()).rev() {
            let BeamState { position, heading } = fronts[i];
            if !grid.contains(position) {
                fronts.swap_remove(i);
                continue;
            }

            let deflection = rule(grid.cell_at(position)?, heading);
            if !crossings.insert((position, deflection.crossing)) {
                fronts.swap_remove(i);
                continue;
            }

            fronts[i] = BeamState::new(position + deflection.first.offset(), deflection.first);
            if let Some(second) = deflection.second {
                fronts.push(BeamState::new(position + second.offset(), second));
            }
        }
    }

    tracing::trace!(states = crossings.len(), "beams settled");
    Ok(Energized { crossings })
}

/// Pipe maze tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pipe {
    /// `|`
    Vertical,
    /// `-`
    Horizontal,
    /// `L`
    NorthEast,
    /// `J`
    NorthWest,
    /// `7`
    SouthWest,
    /// `F`
    SouthEast,
    /// `.`
    Ground,
    /// `S`, shape unknown
    Start,
}

impl Pipe {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '|' => Some(Pipe::Vertical),
            '-' => Some(Pipe::Horizontal),
            'L' => Some(Pipe::NorthEast),
            'J' => Some(Pipe::NorthWest),
            '7' => Some(Pipe::SouthWest),
            'F' => Some(Pipe::SouthEast),
            '.' => Some(Pipe::Ground),
            'S' => Some(Pipe::Start),
            _ => None,
        }
    }

    /// The two sides the pipe opens to
    pub fn exits(self) -> Option<[Heading; 2]> {
        use Heading::*;

        match self {
            Pipe::Vertical => Some([Up, Down]),
            Pipe::Horizontal => Some([Left, Right]),
            Pipe::NorthEast => Some([Up, Right]),
            Pipe::NorthWest => Some([Up, Left]),
            Pipe::SouthWest => Some([Down, Left]),
            Pipe::SouthEast => Some([Down, Right]),
            Pipe::Ground | Pipe::Start => None,
        }
    }

    /// Heading out of the pipe for a front arriving along `heading`
    pub fn exit_for(self, heading: Heading) -> Option<Heading> {
        let [a, b] = self.exits()?;
        let entry = heading.opposite();
        if entry == a {
            Some(b)
        } else if entry == b {
            Some(a)
        } else {
            None
        }
    }
}

/// A closed pipe loop through the start marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipeLoop {
    /// Cells in walking order, starting at the marker
    path: Vec<Position>,
}

impl PipeLoop {
    /// Find the start marker and follow the pipes from it until they lead
    /// back there.
    ///
    /// Each heading out of the start is tried in turn; the first one that
    /// closes wins. A walk that runs into ground, off the grid or into a pipe
    /// not facing it is abandoned.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn trace(grid: &Grid<Pipe>) -> Result<PipeLoop, SearchError> {
        let start = grid
            .find(|&pipe| pipe == Pipe::Start)
            .ok_or(SearchError::MissingStart)?;

        let limit = grid.width() * grid.height();
        for heading in Heading::ALL {
            if let Some(path) = Self::walk(grid, start, heading, limit) {
                tracing::debug!(len = path.len(), ?heading, "pipe loop closed");
                return Ok(PipeLoop { path });
            }
        }

        Err(SearchError::LoopNotClosed(start))
    }

    fn walk(
        grid: &Grid<Pipe>,
        start: Position,
        mut heading: Heading,
        limit: usize,
    ) -> Option<Vec<Position>> {
        let mut path = vec![start];
        let mut position = start;

        while path.len() <= limit {
            position += heading.offset();
            match grid.get(position)? {
                Pipe::Start => return Some(path),
                pipe => heading = pipe.exit_for(heading)?,
            }
            path.push(position);
        }

        None
    }

    pub fn path(&self) -> &[Position] {
        &self.path
    }

    /// Number of pipe cells in the loop, start included
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Steps from the start to the opposite point of the loop
    pub fn farthest(&self) -> usize {
        self.path.len() / 2
    }

    /// Tiles strictly inside the loop (shoelace area, then Pick's theorem)
    pub fn enclosed_tiles(&self) -> i64 {
        let vertices: Vec<_> = self.path.iter().map(|p| p.as_i64vec2()).collect();
        polygon::interior_points(&vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    const CONTRAPTION: &str = r".|...\....
|.-.\.....
.....|-...
........|.
..........
.........\
..../.\\..
.-.-/..|..
.|....-|.\
..//.|....";

    fn contraption() -> Grid<BeamTile> {
        Grid::parse(CONTRAPTION, BeamTile::from_char).unwrap()
    }

    fn beam(grid: &Grid<BeamTile>, x: i32, y: i32, heading: Heading) -> Energized {
        energize(grid, BeamState::new(IVec2::new(x, y), heading), |t, h| {
            t.deflect(h)
        })
        .unwrap()
    }

    #[test]
    fn test_contraption_from_top_left() {
        assert_eq!(beam(&contraption(), 0, 0, Heading::Right).cell_count(), 46);
    }

    #[test]
    fn test_contraption_best_entry() {
        assert_eq!(beam(&contraption(), 3, 0, Heading::Down).cell_count(), 51);
    }

    #[test]
    fn test_immediate_exit_counts_start_only() {
        let grid = Grid::parse("..\n..", BeamTile::from_char).unwrap();
        assert_eq!(beam(&grid, 1, 0, Heading::Right).cell_count(), 1);
        assert_eq!(beam(&grid, 0, 0, Heading::Up).cell_count(), 1);
        assert_eq!(beam(&grid, 5, 5, Heading::Up).cell_count(), 0);
    }

    #[test]
    fn test_splitter_loop_terminates() {
        // Both halves of the split come back around to the splitter
        let grid = Grid::parse("/-\\\n\\|/", BeamTile::from_char).unwrap();
        let lit = beam(&grid, 1, 0, Heading::Down);
        assert_eq!(lit.cell_count(), 6);
    }

    #[test]
    fn test_walk_is_deterministic() {
        let grid = contraption();
        let first = beam(&grid, 0, 4, Heading::Right);
        let second = beam(&grid, 0, 4, Heading::Right);
        assert_eq!(first.positions(), second.positions());
        assert_eq!(first.state_count(), second.state_count());
    }

    #[test]
    fn test_pipe_exits() {
        assert_eq!(Pipe::SouthWest.exit_for(Heading::Right), Some(Heading::Down));
        assert_eq!(Pipe::SouthWest.exit_for(Heading::Up), Some(Heading::Left));
        assert_eq!(Pipe::SouthWest.exit_for(Heading::Down), None);
        assert_eq!(Pipe::Ground.exit_for(Heading::Down), None);
    }

    #[test]
    fn test_small_loop_length_and_area() {
        let grid = Grid::parse(".....\n.S-7.\n.|.|.\n.L-J.\n.....", Pipe::from_char).unwrap();
        let pipes = PipeLoop::trace(&grid).unwrap();
        assert_eq!(pipes.len(), 8);
        assert_eq!(pipes.farthest(), 4);
        assert_eq!(pipes.enclosed_tiles(), 1);
        assert_eq!(pipes.path()[0], IVec2::new(1, 1));
    }

    #[test]
    fn test_loop_ignores_dangling_pipes() {
        let grid = Grid::parse("-L|F7\n7S-7|\nL|7||\n-L-J|\nL|-JF", Pipe::from_char).unwrap();
        let pipes = PipeLoop::trace(&grid).unwrap();
        assert_eq!(pipes.len(), 8);
        assert_eq!(pipes.enclosed_tiles(), 1);
    }

    #[test]
    fn test_loop_errors() {
        let no_start = Grid::parse("F7\nLJ", Pipe::from_char).unwrap();
        assert_eq!(PipeLoop::trace(&no_start), Err(SearchError::MissingStart));

        let open = Grid::parse("S-.\n...", Pipe::from_char).unwrap();
        assert_eq!(
            PipeLoop::trace(&open),
            Err(SearchError::LoopNotClosed(IVec2::ZERO))
        );
    }
}
