//! Corridor mazes reduced to junction graphs, and the longest simple path
//! through them
//!
//! A hiking map is mostly one-cell-wide corridors. Contracting every corridor
//! into a single weighted edge leaves a few dozen nodes, which is small
//! enough for an exhaustive depth-first search.

use crate::utils::error::SearchError;
use crate::utils::grid::{Grid, Heading, Position};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// Hiking map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trail {
    Path,
    Forest,
    /// Steep slope that can only be walked downhill, i.e. towards the heading
    Slope(Heading),
}

impl Trail {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Trail::Path),
            '#' => Some(Trail::Forest),
            '^' => Some(Trail::Slope(Heading::Up)),
            '>' => Some(Trail::Slope(Heading::Right)),
            'v' => Some(Trail::Slope(Heading::Down)),
            '<' => Some(Trail::Slope(Heading::Left)),
            _ => None,
        }
    }

    pub fn is_passable(self) -> bool {
        self != Trail::Forest
    }
}

/// Whether slope tiles make their corridors one-way
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slopes {
    Respect,
    Ignore,
}

/// Directed graph of junctions, keyed by grid position.
///
/// Edges carry the number of steps of the corridor they replace. Parallel
/// edges collapse to the longest one.
#[derive(Debug, Clone)]
pub struct JunctionGraph {
    positions: Vec<Position>,
    index: HashMap<Position, usize>,
    outgoing: Vec<BTreeMap<usize, u32>>,
    removed: Vec<bool>,
    start: usize,
    end: usize,
}

impl JunctionGraph {
    fn empty(start: Position, end: Position) -> Self {
        let mut graph = Self {
            positions: Vec::new(),
            index: HashMap::new(),
            outgoing: Vec::new(),
            removed: Vec::new(),
            start: 0,
            end: 0,
        };
        graph.start = graph.intern(start).0;
        graph.end = graph.intern(end).0;
        graph
    }

    fn intern(&mut self, pos: Position) -> (usize, bool) {
        if let Some(&id) = self.index.get(&pos) {
            return (id, false);
        }
        let id = self.positions.len();
        self.positions.push(pos);
        self.index.insert(pos, id);
        self.outgoing.push(BTreeMap::new());
        self.removed.push(false);
        (id, true)
    }

    fn add_edge(&mut self, from: usize, to: usize, weight: u32) {
        let slot = self.outgoing[from].entry(to).or_insert(weight);
        *slot = (*slot).max(weight);
    }

    /// Build a graph from explicit `(from, to, weight)` edges
    pub fn from_edges<I>(start: Position, end: Position, edges: I) -> Self
    where
        I: IntoIterator<Item = (Position, Position, u32)>,
    {
        let mut graph = Self::empty(start, end);
        for (from, to, weight) in edges {
            let from = graph.intern(from).0;
            let to = graph.intern(to).0;
            if from != to {
                graph.add_edge(from, to, weight);
            }
        }
        graph
    }

    /// Contract the corridors of `grid` reachable from `start`.
    ///
    /// Nodes are `start`, `end`, every cell with three or more open
    /// neighbours and every dead end. Each corridor is walked from both of
    /// its nodes; under [`Slopes::Respect`] a walk that climbs a slope or
    /// leaves one sideways produces no edge, which leaves that corridor
    /// one-way.
    #[tracing::instrument(level = "debug", skip(grid))]
    pub fn contract(
        grid: &Grid<Trail>,
        start: Position,
        end: Position,
        slopes: Slopes,
    ) -> Result<Self, SearchError> {
        if !grid.cell_at(start)?.is_passable() || !grid.cell_at(end)?.is_passable() {
            return Err(SearchError::MissingStart);
        }

        let open = |pos: Position| grid.get(pos).is_some_and(|trail| trail.is_passable());
        let exits = |pos: Position| {
            Heading::ALL
                .into_iter()
                .map(move |heading| (heading, pos + heading.offset()))
                .filter(move |&(_, next)| open(next))
        };

        let mut graph = Self::empty(start, end);
        let mut queue = VecDeque::from([graph.start]);
        let mut queued = HashSet::from([graph.start]);

        while let Some(node) = queue.pop_front() {
            let origin = graph.positions[node];

            for (first, entry) in exits(origin) {
                let mut previous = origin;
                let mut current = entry;
                let mut steps = 1;
                let mut downhill = step_allowed(grid, origin, entry, first);

                while current != start && current != end && exits(current).count() < 3 {
                    let mut onward = exits(current).filter(|&(_, next)| next != previous);
                    let Some((heading, next)) = onward.next() else {
                        break;
                    };
                    downhill &= step_allowed(grid, current, next, heading);
                    previous = current;
                    current = next;
                    steps += 1;
                }

                if current == origin {
                    continue;
                }

                let (target, _) = graph.intern(current);
                if queued.insert(target) {
                    queue.push_back(target);
                }
                if downhill || slopes == Slopes::Ignore {
                    graph.add_edge(node, target, steps);
                }
            }
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "contracted corridors"
        );
        Ok(graph)
    }

    pub fn start(&self) -> Position {
        self.positions[self.start]
    }

    pub fn end(&self) -> Position {
        self.positions[self.end]
    }

    fn live(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.positions.len()).filter(|&id| !self.removed[id])
    }

    pub fn node_count(&self) -> usize {
        self.live().count()
    }

    pub fn edge_count(&self) -> usize {
        self.live().map(|id| self.outgoing[id].len()).sum()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.index.get(&pos).is_some_and(|&id| !self.removed[id])
    }

    /// Outgoing edges of the node at `pos` as `(neighbour, weight)`
    pub fn edges(&self, pos: Position) -> Vec<(Position, u32)> {
        match self.index.get(&pos) {
            Some(&id) if !self.removed[id] => self.outgoing[id]
                .iter()
                .map(|(&to, &weight)| (self.positions[to], weight))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn incoming(&self, id: usize) -> Vec<(usize, u32)> {
        self.live()
            .filter_map(|from| self.outgoing[from].get(&id).map(|&w| (from, w)))
            .collect()
    }

    fn distinct_neighbours(&self, id: usize) -> HashSet<usize> {
        self.outgoing[id]
            .keys()
            .copied()
            .chain(self.incoming(id).into_iter().map(|(from, _)| from))
            .collect()
    }

    fn remove(&mut self, id: usize) {
        self.removed[id] = true;
        self.outgoing[id].clear();
        for edges in &mut self.outgoing {
            edges.remove(&id);
        }
    }

    /// Shrink the graph without changing the longest start-to-end path.
    ///
    /// Runs to a fixed point:
    /// - edges back into `start` or out of `end` are dropped
    /// - a node `start` has as its only successor is folded into `start`
    /// - a node that is the only way into `end` is folded into `end`
    /// - nodes with no way in, no way out or a single distinct neighbour go
    /// - pass-through nodes with exactly two neighbours become one edge
    #[tracing::instrument(level = "debug", skip(self), fields(nodes = self.node_count()))]
    pub fn simplify(&mut self) {
        let (start, end) = (self.start, self.end);
        for edges in &mut self.outgoing {
            edges.remove(&start);
        }
        self.outgoing[end].clear();

        while self.fuse_start() | self.fuse_end() | self.prune_dead_ends() | self.merge_pass_through()
        {
        }

        tracing::debug!(
            nodes = self.node_count(),
            edges = self.edge_count(),
            "simplified"
        );
    }

    fn fuse_start(&mut self) -> bool {
        let mut changed = false;
        while self.outgoing[self.start].len() == 1 {
            let Some((&next, &weight)) = self.outgoing[self.start].iter().next() else {
                break;
            };
            if next == self.end {
                break;
            }
            let onward: Vec<_> = self.outgoing[next]
                .iter()
                .map(|(&to, &w)| (to, w + weight))
                .collect();
            self.remove(next);
            for (to, w) in onward {
                self.add_edge(self.start, to, w);
            }
            changed = true;
        }
        changed
    }

    fn fuse_end(&mut self) -> bool {
        let mut changed = false;
        loop {
            let incoming = self.incoming(self.end);
            let [(last, weight)] = incoming[..] else {
                break;
            };
            if last == self.start {
                break;
            }
            let feeding = self.incoming(last);
            self.remove(last);
            for (from, w) in feeding {
                self.add_edge(from, self.end, w + weight);
            }
            changed = true;
        }
        changed
    }

    fn prune_dead_ends(&mut self) -> bool {
        let mut changed = false;
        let mut pending: VecDeque<usize> = self.live().collect();
        while let Some(id) = pending.pop_front() {
            if id == self.start || id == self.end || self.removed[id] {
                continue;
            }
            let stranded = self.outgoing[id].is_empty()
                || self.incoming(id).is_empty()
                || self.distinct_neighbours(id).len() < 2;
            if stranded {
                let neighbours = self.distinct_neighbours(id);
                self.remove(id);
                pending.extend(neighbours);
                changed = true;
            }
        }
        changed
    }

    fn merge_pass_through(&mut self) -> bool {
        let mut changed = false;
        let candidates: Vec<usize> = self.live().collect();
        for id in candidates {
            if id == self.start || id == self.end || self.removed[id] {
                continue;
            }
            let neighbours: Vec<usize> = self.distinct_neighbours(id).into_iter().collect();
            let [a, b] = neighbours[..] else {
                continue;
            };

            let via = |from: usize, to: usize| {
                let into = self.outgoing[from].get(&id)?;
                let out = self.outgoing[id].get(&to)?;
                Some(into + out)
            };
            let (forward, backward) = (via(a, b), via(b, a));

            self.remove(id);
            if let Some(weight) = forward {
                self.add_edge(a, b, weight);
            }
            if let Some(weight) = backward {
                self.add_edge(b, a, weight);
            }
            changed = true;
        }
        changed
    }

    /// Length of the longest simple path from start to end.
    ///
    /// With `workers > 1` the search tree is first split breadth-first into
    /// partial paths, roughly four per worker, each owning its own visited
    /// buffer; the partials are searched on a dedicated pool of `workers`
    /// threads and reduced with `max`. The answer does not depend on
    /// `workers`.
    #[tracing::instrument(level = "debug", skip(self), fields(nodes = self.node_count()))]
    pub fn longest_path(&self, workers: usize) -> Result<u32, SearchError> {
        let search = LongestPath::new(self);
        let root = search.root();

        let best = if workers <= 1 {
            search.run(root)
        } else {
            let (partials, finished) = search.partition(root, workers * 4);
            tracing::debug!(partials = partials.len(), workers, "split search");

            let searched = match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
                Ok(pool) => pool.install(|| {
                    partials
                        .into_par_iter()
                        .filter_map(|partial| search.run(partial))
                        .max()
                }),
                Err(error) => {
                    tracing::warn!(%error, "no worker pool, searching sequentially");
                    partials
                        .into_iter()
                        .filter_map(|partial| search.run(partial))
                        .max()
                }
            };
            searched.max(finished)
        };

        best.ok_or(SearchError::NoPath)
    }
}

fn step_allowed(grid: &Grid<Trail>, from: Position, to: Position, heading: Heading) -> bool {
    let leaves = match grid.get(from) {
        Some(Trail::Slope(downhill)) => *downhill == heading,
        _ => true,
    };
    let enters = match grid.get(to) {
        Some(Trail::Slope(downhill)) => *downhill != heading.opposite(),
        _ => true,
    };
    leaves && enters
}

/// A path prefix with everything needed to continue it independently
#[derive(Debug, Clone)]
struct Partial {
    node: usize,
    length: u32,
    visited: Vec<bool>,
    /// Sum of the best way into every unvisited node
    headroom: u32,
}

struct LongestPath<'g> {
    graph: &'g JunctionGraph,
    best_in: Vec<u32>,
}

impl<'g> LongestPath<'g> {
    fn new(graph: &'g JunctionGraph) -> Self {
        let mut best_in = vec![0; graph.positions.len()];
        for from in graph.live() {
            for (&to, &weight) in &graph.outgoing[from] {
                best_in[to] = best_in[to].max(weight);
            }
        }
        Self { graph, best_in }
    }

    fn root(&self) -> Partial {
        let mut visited = vec![false; self.graph.positions.len()];
        visited[self.graph.start] = true;
        let headroom = self.best_in.iter().sum::<u32>() - self.best_in[self.graph.start];
        Partial {
            node: self.graph.start,
            length: 0,
            visited,
            headroom,
        }
    }

    fn extend(&self, partial: &Partial) -> Vec<Partial> {
        self.graph.outgoing[partial.node]
            .iter()
            .filter(|&(&next, _)| !partial.visited[next])
            .map(|(&next, &weight)| {
                let mut child = partial.clone();
                child.visited[next] = true;
                child.node = next;
                child.length += weight;
                child.headroom -= self.best_in[next];
                child
            })
            .collect()
    }

    /// Expand prefixes breadth-first until there are `target` of them.
    ///
    /// Prefixes that already reached the end are folded into the second
    /// value instead of being returned.
    fn partition(&self, root: Partial, target: usize) -> (Vec<Partial>, Option<u32>) {
        let mut frontier = VecDeque::from([root]);
        let mut finished = None;

        while frontier.len() < target {
            let Some(partial) = frontier.pop_front() else {
                break;
            };
            if partial.node == self.graph.end {
                finished = finished.max(Some(partial.length));
                continue;
            }
            frontier.extend(self.extend(&partial));
        }

        (frontier.into(), finished)
    }

    fn run(&self, mut partial: Partial) -> Option<u32> {
        let mut best = None;
        self.explore(&mut partial, &mut best);
        best
    }

    fn explore(&self, partial: &mut Partial, best: &mut Option<u32>) {
        if partial.node == self.graph.end {
            *best = (*best).max(Some(partial.length));
            return;
        }
        if best.is_some_and(|best| partial.length + partial.headroom <= best) {
            return;
        }

        let node = partial.node;
        for (&next, &weight) in &self.graph.outgoing[node] {
            if partial.visited[next] {
                continue;
            }

            partial.visited[next] = true;
            partial.headroom -= self.best_in[next];
            partial.length += weight;
            partial.node = next;

            self.explore(partial, best);

            partial.node = node;
            partial.length -= weight;
            partial.headroom += self.best_in[next];
            partial.visited[next] = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use proptest::prelude::*;

    const ONE_JUNCTION: &str = "\
#.#####
#.#####
#.....#
#.#####
#.#####";

    fn trails(input: &str) -> Grid<Trail> {
        Grid::parse(input, Trail::from_char).unwrap()
    }

    fn p(x: i32, y: i32) -> Position {
        IVec2::new(x, y)
    }

    #[test]
    fn test_single_junction_edges() {
        let graph = JunctionGraph::contract(&trails(ONE_JUNCTION), p(1, 0), p(1, 4), Slopes::Ignore)
            .unwrap();

        assert_eq!(
            graph.edges(p(1, 2)),
            vec![(p(1, 0), 2), (p(1, 4), 2), (p(5, 2), 4)]
        );
        assert_eq!(graph.edges(p(1, 0)), vec![(p(1, 2), 2)]);
        assert_eq!(graph.edges(p(5, 2)), vec![(p(1, 2), 4)]);
        assert_eq!(graph.node_count(), 4);
    }

    #[test]
    fn test_simplify_single_junction() {
        let mut graph =
            JunctionGraph::contract(&trails(ONE_JUNCTION), p(1, 0), p(1, 4), Slopes::Ignore)
                .unwrap();
        graph.simplify();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edges(p(1, 0)), vec![(p(1, 4), 4)]);
        assert_eq!(graph.longest_path(1), Ok(4));
    }

    #[test]
    fn test_slope_makes_corridor_one_way() {
        let map = ONE_JUNCTION.replacen("#.#####\n#.#####", "#.#####\n#v#####", 1);
        let graph = JunctionGraph::contract(&trails(&map), p(1, 0), p(1, 4), Slopes::Respect)
            .unwrap();

        assert_eq!(graph.edges(p(1, 0)), vec![(p(1, 2), 2)]);
        assert!(graph.edges(p(1, 2)).iter().all(|&(to, _)| to != p(1, 0)));

        let both_ways = JunctionGraph::contract(&trails(&map), p(1, 0), p(1, 4), Slopes::Ignore)
            .unwrap();
        assert!(both_ways.edges(p(1, 2)).contains(&(p(1, 0), 2)));
    }

    #[test]
    fn test_straight_corridor_is_one_edge() {
        let mut graph =
            JunctionGraph::contract(&trails("#.#\n#.#\n#.#\n#.#"), p(1, 0), p(1, 3), Slopes::Respect)
                .unwrap();
        graph.simplify();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.longest_path(4), Ok(3));
    }

    #[test]
    fn test_blocked_start() {
        assert_eq!(
            JunctionGraph::contract(&trails(ONE_JUNCTION), p(0, 0), p(1, 4), Slopes::Ignore)
                .map(|graph| graph.node_count()),
            Err(SearchError::MissingStart)
        );
    }

    #[test]
    fn test_unreachable_end() {
        let graph = JunctionGraph::from_edges(p(0, 0), p(9, 9), [(p(0, 0), p(1, 0), 3)]);
        assert_eq!(graph.longest_path(1), Err(SearchError::NoPath));
        assert_eq!(graph.longest_path(3), Err(SearchError::NoPath));
    }

    #[test]
    fn test_longest_prefers_detour() {
        //   s -1-> a -1-> e
        //   s -5-> b -5-> a, a -5-> c -5-> e
        let (s, a, b, c, e) = (p(0, 0), p(1, 0), p(2, 0), p(3, 0), p(4, 0));
        let graph = JunctionGraph::from_edges(
            s,
            e,
            [
                (s, a, 1),
                (a, e, 1),
                (s, b, 5),
                (b, a, 5),
                (a, c, 5),
                (c, e, 5),
            ],
        );
        assert_eq!(graph.longest_path(1), Ok(20));
        assert_eq!(graph.longest_path(8), Ok(20));
    }

    fn arb_graph() -> impl Strategy<Value = JunctionGraph> {
        (3usize..9).prop_flat_map(|nodes| {
            proptest::collection::vec((0..nodes, 0..nodes, 1u32..20), 0..nodes * 3).prop_map(
                move |edges| {
                    let pos = |i: usize| IVec2::new(i as i32, 0);
                    JunctionGraph::from_edges(
                        pos(0),
                        pos(nodes - 1),
                        edges.into_iter().map(|(a, b, w)| (pos(a), pos(b), w)),
                    )
                },
            )
        })
    }

    proptest! {
        #[test]
        fn prop_worker_count_does_not_change_answer(graph in arb_graph(), workers in 2usize..6) {
            prop_assert_eq!(graph.longest_path(1), graph.longest_path(workers));
        }

        #[test]
        fn prop_simplify_preserves_longest_path(graph in arb_graph()) {
            let mut simplified = graph.clone();
            simplified.simplify();
            prop_assert_eq!(simplified.longest_path(1), graph.longest_path(1));
            prop_assert!(simplified.node_count() <= graph.node_count());
        }
    }
}
