//! Least-cost paths where the mover must travel straight for a bounded run
//! before turning
//!
//! States are `(position, heading, run)`; entering a cell costs its value.

use crate::utils::error::SearchError;
use crate::utils::grid::{Grid, Heading, Position};
use crate::utils::visited::CostMap;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::collections::HashMap;

/// Consecutive steps allowed in one heading: at least `min` before turning or
/// stopping, at most `max` before a turn is forced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunLimits {
    pub min: u8,
    pub max: u8,
}

impl RunLimits {
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    fn validate(self) -> Result<Self, SearchError> {
        if self.min == 0 || self.min > self.max {
            return Err(SearchError::InvalidRunLimits {
                min: self.min,
                max: self.max,
            });
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchState {
    pub position: Position,
    pub heading: Heading,
    /// Steps taken in `heading` so far; `0` only for a start state
    pub run: u8,
}

impl SearchState {
    fn sort_key(&self) -> (i32, i32, Heading, u8) {
        (self.position.x, self.position.y, self.heading, self.run)
    }

    fn successors(self, limits: RunLimits) -> impl Iterator<Item = SearchState> {
        let straight = (self.run < limits.max).then(|| SearchState {
            position: self.position + self.heading.offset(),
            heading: self.heading,
            run: self.run + 1,
        });

        let turns = (self.run >= limits.min)
            .then(|| self.heading.turns())
            .into_iter()
            .flatten()
            .map(move |heading| SearchState {
                position: self.position + heading.offset(),
                heading,
                run: 1,
            });

        straight.into_iter().chain(turns)
    }
}

/// Min-heap entry on accumulated cost
#[derive(Debug, PartialEq, Eq)]
struct Queued {
    cost: u32,
    state: SearchState,
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.state.sort_key().cmp(&self.state.sort_key()))
    }
}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// An optimal route and the states it went through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub cost: u32,
    /// From a start state (run `0`) to the goal; empty when start is the target
    pub states: Vec<SearchState>,
}

impl Route {
    /// Length of every straight run along the route, in order
    pub fn runs(&self) -> Vec<u8> {
        let mut runs: Vec<u8> = self
            .states
            .windows(2)
            .filter(|pair| pair[1].run == 1 && pair[0].run > 0)
            .map(|pair| pair[0].run)
            .collect();

        if let Some(last) = self.states.last().filter(|state| state.run > 0) {
            runs.push(last.run);
        }
        runs
    }
}

/// Dijkstra from `start` to `target` under `limits`.
///
/// The mover starts with an empty run facing every heading, and may only
/// stop on `target` after at least `limits.min` straight steps. A state
/// is expanded only when its cost beats the best recorded for it.
///
/// ```
/// use glam::IVec2;
/// use lavafall_solutions::utils::Grid;
/// use lavafall_solutions::utils::crucible::{least_cost, RunLimits};
///
/// let grid = Grid::parse("111\n191\n111", |c| c.to_digit(10).map(|d| d as u8)).unwrap();
/// let route = least_cost(&grid, IVec2::ZERO, IVec2::new(2, 2), RunLimits::new(1, 3)).unwrap();
/// assert_eq!(route.cost, 4);
/// ```
#[tracing::instrument(level = "debug", skip(grid), fields(width = grid.width(), height = grid.height()))]
pub fn least_cost(
    grid: &Grid<u8>,
    start: Position,
    target: Position,
    limits: RunLimits,
) -> Result<Route, SearchError> {
    let limits = limits.validate()?;
    grid.cell_at(start)?;
    grid.cell_at(target)?;

    if start == target {
        return Ok(Route {
            cost: 0,
            states: Vec::new(),
        });
    }

    let mut best = CostMap::new();
    let mut came_from = HashMap::new();
    let mut queue = BinaryHeap::new();

    for heading in Heading::ALL {
        let state = SearchState {
            position: start,
            heading,
            run: 0,
        };
        best.improve(state, 0);
        queue.push(Queued { cost: 0, state });
    }

    while let Some(Queued { cost, state }) = queue.pop() {
        if best.get(&state).is_some_and(|known| known < cost) {
            continue;
        }

        if state.position == target && state.run >= limits.min {
            tracing::debug!(cost, expanded = best.len(), "reached target");
            return Ok(Route {
                cost,
                states: unwind(&came_from, state),
            });
        }

        for next in state.successors(limits) {
            let Some(&entry) = grid.get(next.position) else {
                continue;
            };
            let next_cost = cost + u32::from(entry);
            if best.improve(next, next_cost) {
                came_from.insert(next, state);
                queue.push(Queued {
                    cost: next_cost,
                    state: next,
                });
            }
        }
    }

    Err(SearchError::NoPath)
}

fn unwind(came_from: &HashMap<SearchState, SearchState>, goal: SearchState) -> Vec<SearchState> {
    let mut states = vec![goal];
    let mut current = goal;
    while let Some(&previous) = came_from.get(&current) {
        states.push(previous);
        current = previous;
    }
    states.reverse();
    states
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use proptest::prelude::*;

    const CITY: &str = "\
2413432311323
3215453535623
3255245654254
3446585845452
4546657867536
1438598798454
4457876987766
3637877979653
4654967986887
4564679986453
1224686865563
2546548887735
4322674655533";

    const UNLUCKY: &str = "\
111111111111
999999999991
999999999991
999999999991
999999999991";

    fn p(x: i32, y: i32) -> Position {
        IVec2::new(x, y)
    }

    fn digits(input: &str) -> Grid<u8> {
        Grid::parse(input, |c| c.to_digit(10).map(|d| d as u8)).unwrap()
    }

    fn corner_to_corner(grid: &Grid<u8>, limits: RunLimits) -> Result<Route, SearchError> {
        let target = IVec2::new(grid.width() as i32 - 1, grid.height() as i32 - 1);
        least_cost(grid, IVec2::ZERO, target, limits)
    }

    fn entered_cost(grid: &Grid<u8>, route: &Route) -> u32 {
        route
            .states
            .iter()
            .skip(1)
            .map(|state| u32::from(grid.get(state.position).copied().unwrap_or(0)))
            .sum()
    }

    #[test]
    fn test_city_normal_crucible() {
        let grid = digits(CITY);
        let route = corner_to_corner(&grid, RunLimits::new(1, 3)).unwrap();
        assert_eq!(route.cost, 102);
        assert_eq!(entered_cost(&grid, &route), 102);
        assert!(route.runs().iter().all(|&run| (1..=3).contains(&run)));
    }

    #[test]
    fn test_city_ultra_crucible() {
        let grid = digits(CITY);
        let route = corner_to_corner(&grid, RunLimits::new(4, 10)).unwrap();
        assert_eq!(route.cost, 94);
        assert!(route.runs().iter().all(|&run| (4..=10).contains(&run)));
    }

    #[test]
    fn test_ultra_crucible_cannot_stop_early() {
        let grid = digits(UNLUCKY);
        let route = corner_to_corner(&grid, RunLimits::new(4, 10)).unwrap();
        assert_eq!(route.cost, 71);
        let runs = route.runs();
        assert!(runs.iter().all(|&run| (4..=10).contains(&run)));
        assert_eq!(runs.iter().map(|&run| u32::from(run)).sum::<u32>(), 15);
    }

    #[test]
    fn test_uniform_grid_is_manhattan() {
        let grid = digits("111\n111\n111");
        assert_eq!(corner_to_corner(&grid, RunLimits::new(1, 3)).unwrap().cost, 4);
    }

    #[test]
    fn test_any_corner_pair_is_reachable() {
        let grid = digits("111\n111\n111");
        let corners = [p(0, 0), p(2, 0), p(0, 2), p(2, 2)];
        for start in corners {
            for target in corners.into_iter().filter(|&t| t != start) {
                let route = least_cost(&grid, start, target, RunLimits::new(1, 3)).unwrap();
                let manhattan = (target - start).abs().element_sum() as u32;
                assert_eq!(route.cost, manhattan, "{start} -> {target}");
            }
        }
    }

    #[test]
    fn test_bottom_right_to_top_left() {
        // Reversing a route swaps which corner's cost is paid: 102 - 3 + 2
        let grid = digits(CITY);
        let back = least_cost(&grid, p(12, 12), IVec2::ZERO, RunLimits::new(1, 3)).unwrap();
        assert_eq!(back.cost, 101);
        assert_eq!(entered_cost(&grid, &back), back.cost);
        assert!(back.runs().iter().all(|&run| (1..=3).contains(&run)));
    }

    #[test]
    fn test_start_is_target() {
        let grid = digits("5");
        let route = corner_to_corner(&grid, RunLimits::new(4, 10)).unwrap();
        assert_eq!(route.cost, 0);
        assert!(route.states.is_empty());
    }

    #[test]
    fn test_no_path_is_explicit() {
        let grid = digits("11");
        assert_eq!(
            corner_to_corner(&grid, RunLimits::new(4, 10)),
            Err(SearchError::NoPath)
        );
    }

    #[test]
    fn test_invalid_limits() {
        let grid = digits("11");
        for (min, max) in [(0, 3), (5, 4)] {
            assert_eq!(
                corner_to_corner(&grid, RunLimits::new(min, max)),
                Err(SearchError::InvalidRunLimits { min, max })
            );
        }
    }

    #[test]
    fn test_out_of_bounds_endpoints() {
        let grid = digits("11");
        assert!(matches!(
            least_cost(&grid, IVec2::ZERO, IVec2::new(2, 0), RunLimits::new(1, 3)),
            Err(SearchError::Grid(_))
        ));
    }

    fn arb_digits() -> impl Strategy<Value = Grid<u8>> {
        (1usize..9, 1usize..9).prop_flat_map(|(w, h)| {
            proptest::collection::vec(1u8..=9, w * h).prop_map(move |cells| {
                let rows = cells.chunks(w).map(<[u8]>::to_vec).collect();
                Grid::from_rows(rows).unwrap()
            })
        })
    }

    proptest! {
        #[test]
        fn prop_square_uniform_grid_costs_manhattan(n in 1usize..12, cost in 1u8..=9) {
            let grid = Grid::from_fn(n, n, |_| cost);
            let route = corner_to_corner(&grid, RunLimits::new(1, 3)).unwrap();
            prop_assert_eq!(route.cost, 2 * (n as u32 - 1) * u32::from(cost));
        }

        #[test]
        fn prop_routes_respect_run_limits(grid in arb_digits(), min in 1u8..5, extra in 0u8..6) {
            let limits = RunLimits::new(min, min + extra);
            match corner_to_corner(&grid, limits) {
                Ok(route) => {
                    prop_assert_eq!(entered_cost(&grid, &route), route.cost);
                    for run in route.runs() {
                        prop_assert!((limits.min..=limits.max).contains(&run));
                    }
                }
                Err(error) => prop_assert_eq!(error, SearchError::NoPath),
            }
        }
    }
}
