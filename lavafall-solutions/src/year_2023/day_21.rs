use crate::utils::sequence::extrapolate;
use crate::utils::visited::StateSet;
use crate::utils::{Grid, Heading, Position};
use lavafall_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 21, tags = ["grid", "bfs", "extrapolation"])]
pub struct Solver;

const SHORT_WALK: u64 = 64;
const LONG_WALK: u64 = 26_501_365;

/// How positions outside the map are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tiling {
    Bounded,
    Repeating,
}

#[derive(Debug)]
pub struct Garden {
    /// `true` for garden plots, `false` for rocks
    plots: Grid<bool>,
    start: Position,
}

impl Garden {
    fn is_plot(&self, pos: Position, tiling: Tiling) -> bool {
        let pos = match tiling {
            Tiling::Bounded => pos,
            Tiling::Repeating => Position::new(
                pos.x.rem_euclid(self.plots.width() as i32),
                pos.y.rem_euclid(self.plots.height() as i32),
            ),
        };
        self.plots.get(pos).copied().unwrap_or(false)
    }

    /// Plots the elf can stand on after exactly `steps` steps.
    ///
    /// A plot first reached at distance `d <= steps` counts when `d` has the
    /// same parity as `steps`, since the elf can step back and forth.
    fn reachable(&self, steps: u64, tiling: Tiling) -> u64 {
        let mut seen = StateSet::new();
        seen.insert(self.start);
        let mut layer = vec![self.start];
        let mut count = u64::from(steps % 2 == 0);

        for distance in 1..=steps {
            layer = layer
                .iter()
                .flat_map(|&pos| Heading::ALL.map(|h| pos + h.offset()))
                .filter(|&next| self.is_plot(next, tiling) && seen.insert(next))
                .collect();
            if layer.is_empty() {
                break;
            }
            if distance % 2 == steps % 2 {
                count += layer.len() as u64;
            }
        }

        count
    }

    /// Reachable plots on the repeating map for a walk far longer than the
    /// map is wide.
    ///
    /// The count sampled every `width` steps grows quadratically, so three
    /// samples that share the target's offset into the period pin it down.
    fn reachable_far(&self, steps: u64) -> u64 {
        let period = self.plots.width() as u64;
        let offset = steps % period;
        let periods = steps / period;
        if periods < 3 {
            return self.reachable(steps, Tiling::Repeating);
        }

        let samples: Vec<i64> = (0..3)
            .map(|k| self.reachable(offset + k * period, Tiling::Repeating) as i64)
            .collect();
        tracing::debug!(?samples, periods, "sampled repeating garden");
        extrapolate(&samples, (periods - 2) as usize) as u64
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Garden;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let marked = Grid::parse(input, |c| match c {
            '.' => Some((true, false)),
            '#' => Some((false, false)),
            'S' => Some((true, true)),
            _ => None,
        })?;
        let start = marked
            .find(|&(_, is_start)| is_start)
            .ok_or_else(|| ParseError::MissingData("start marker `S`".into()))?;
        Ok(Garden {
            plots: marked.map(|&(plot, _)| plot),
            start,
        })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.reachable(SHORT_WALK, Tiling::Bounded).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        if shared.plots.width() != shared.plots.height() {
            return Err(SolveError::failed(ParseError::InvalidFormat(
                "the garden must be square to tile evenly".into(),
            )));
        }
        Ok(shared.reachable_far(LONG_WALK).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "\
...........
.....###.#.
.###.##..#.
..#.#...#..
....#.#....
.##..S####.
.##..#...#.
.......##..
.##.#.####.
.##..##.##.
...........";

    #[test]
    fn test_bounded_walk() {
        let garden = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(garden.reachable(6, Tiling::Bounded), 16);
    }

    #[test]
    fn test_repeating_walk() {
        let garden = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(garden.reachable(6, Tiling::Repeating), 16);
        assert_eq!(garden.reachable(10, Tiling::Repeating), 50);
        assert_eq!(garden.reachable(50, Tiling::Repeating), 1594);
    }

    #[test]
    fn test_far_walk_matches_brute_force_on_open_garden() {
        let garden = Solver::parse(".....\n.....\n..S..\n.....\n.....").unwrap();
        assert_eq!(garden.reachable_far(52), 2809);
        assert_eq!(garden.reachable(52, Tiling::Repeating), 2809);
    }

    #[test]
    fn test_missing_start() {
        assert!(matches!(
            Solver::parse("..\n.#"),
            Err(ParseError::MissingData(_))
        ));
    }
}
