use crate::utils::SearchError;
use crate::utils::sequence::lcm_all;
use anyhow::{Context, anyhow, bail};
use lavafall_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};
use std::collections::HashMap;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 8, tags = ["graph", "cycle"])]
pub struct Solver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Turn {
    Left,
    Right,
}

#[derive(Debug)]
pub struct Network<'a> {
    turns: Vec<Turn>,
    names: Vec<&'a str>,
    /// `(left, right)` node indices per node
    forks: Vec<(usize, usize)>,
}

impl<'a> Network<'a> {
    fn node(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|&n| n == name)
    }

    /// Steps from `from` until a node matching `done` is reached
    fn steps_until<F>(&self, from: usize, done: F) -> Result<u64, SearchError>
    where
        F: Fn(&str) -> bool,
    {
        // Past this many steps the walk is repeating (node, turn) pairs
        let limit = self.turns.len() * self.names.len();
        let mut node = from;

        for (step, turn) in self.turns.iter().cycle().enumerate().take(limit + 1) {
            if done(self.names[node]) {
                return Ok(step as u64);
            }
            let (left, right) = self.forks[node];
            node = match turn {
                Turn::Left => left,
                Turn::Right => right,
            };
        }

        Err(SearchError::NoPath)
    }
}

fn parse_node(line: &str) -> anyhow::Result<(&str, &str, &str)> {
    let (name, fork) = line.split_once(" = ").context("expected `NAME = (LEFT, RIGHT)`")?;
    let (left, right) = fork
        .strip_prefix('(')
        .and_then(|fork| fork.strip_suffix(')'))
        .and_then(|fork| fork.split_once(", "))
        .context("expected `(LEFT, RIGHT)`")?;
    Ok((name.trim(), left.trim(), right.trim()))
}

impl AocParser for Solver {
    type SharedData<'a> = Network<'a>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let mut lines = input.trim().lines();

        let turns = lines
            .next()
            .unwrap_or_default()
            .chars()
            .map(|c| match c {
                'L' => Ok(Turn::Left),
                'R' => Ok(Turn::Right),
                other => Err(anyhow!("(line 1) unexpected turn {other:?}")),
            })
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(|e| ParseError::InvalidFormat(e.to_string()))?;
        if turns.is_empty() {
            return Err(ParseError::MissingData("turn instructions".into()));
        }

        let nodes = lines
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(line_idx, line)| {
                parse_node(line).map_err(|e| anyhow!("(line {}) {}", line_idx + 2, e))
            })
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(|e| ParseError::InvalidFormat(e.to_string()))?;

        let index: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, &(name, _, _))| (name, i))
            .collect();
        let lookup = |name: &str| -> anyhow::Result<usize> {
            match index.get(name) {
                Some(&i) => Ok(i),
                None => bail!("unknown node {name:?}"),
            }
        };

        let forks = nodes
            .iter()
            .map(|&(_, left, right)| Ok((lookup(left)?, lookup(right)?)))
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(|e| ParseError::InvalidFormat(e.to_string()))?;

        Ok(Network {
            turns,
            names: nodes.iter().map(|&(name, _, _)| name).collect(),
            forks,
        })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let start = shared.node("AAA").ok_or(SearchError::MissingStart)?;
        Ok(shared.steps_until(start, |name| name == "ZZZ")?.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let cycles = shared
            .names
            .iter()
            .enumerate()
            .filter(|(_, name)| name.ends_with('A'))
            .map(|(start, _)| shared.steps_until(start, |name| name.ends_with('Z')))
            .collect::<Result<Vec<_>, _>>()?;

        if cycles.is_empty() {
            return Err(SearchError::MissingStart.into());
        }
        Ok(lcm_all(cycles).to_string())
    }
}
