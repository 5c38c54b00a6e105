//! Solver registry: maps puzzles to factories that parse input into a solver

use crate::error::{ParseError, RegistrationError, SolverError};
use crate::instance::{DynSolver, SolverInstance};
use crate::solver::Solver;
use std::collections::BTreeMap;

/// First year of the event
pub const FIRST_YEAR: u16 = 2015;
/// Last year a solver can be registered for
pub const LAST_YEAR: u16 = 2034;
/// Puzzles per year
pub const DAYS_PER_YEAR: u8 = 25;

/// A year/day pair, ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PuzzleId {
    pub year: u16,
    pub day: u8,
}

impl PuzzleId {
    /// Returns `None` when the pair can never name a puzzle
    pub fn new(year: u16, day: u8) -> Option<Self> {
        let valid = (FIRST_YEAR..=LAST_YEAR).contains(&year) && (1..=DAYS_PER_YEAR).contains(&day);
        valid.then_some(Self { year, day })
    }
}

/// Parses input and hands back a ready-to-solve instance.
///
/// `Send + Sync` so one registry can serve a whole thread pool.
pub type SolverFactory =
    Box<dyn for<'a> Fn(&'a str) -> Result<Box<dyn DynSolver + 'a>, ParseError> + Send + Sync>;

/// Metadata about a registered solver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactoryInfo {
    pub year: u16,
    pub day: u8,
    pub parts: u8,
}

struct FactoryEntry {
    factory: SolverFactory,
    parts: u8,
}

fn create_instance<'a, S>(
    year: u16,
    day: u8,
    input: &'a str,
) -> Result<Box<dyn DynSolver + 'a>, ParseError>
where
    S: Solver + 'a,
{
    Ok(Box::new(SolverInstance::<S>::new(year, day, input)?))
}

// Pins the closure to the higher-ranked signature before boxing.
fn boxed_factory<F>(factory: F) -> SolverFactory
where
    F: for<'a> Fn(&'a str) -> Result<Box<dyn DynSolver + 'a>, ParseError> + Send + Sync + 'static,
{
    Box::new(factory)
}

/// Type-erased handle a solver type registers itself through.
///
/// Every [`Solver`] gets this for free, which is what lets
/// [`SolverPlugin`] hold solvers of different types in one static slice.
pub trait RegisterableSolver: Sync {
    /// Number of parts the solver implements
    fn parts(&self) -> u8;

    /// Build a factory creating instances tagged with `year`/`day`
    fn factory(&self, year: u16, day: u8) -> SolverFactory;
}

impl<S> RegisterableSolver for S
where
    S: Solver + Sync + 'static,
{
    fn parts(&self) -> u8 {
        S::PARTS
    }

    fn factory(&self, year: u16, day: u8) -> SolverFactory {
        boxed_factory(move |input| create_instance::<S>(year, day, input))
    }
}

/// Registration record collected by `inventory`.
///
/// Normally emitted by `#[derive(AutoRegisterSolver)]`; writing one by hand
/// looks like:
///
/// ```ignore
/// lavafall_solver::inventory::submit! {
///     lavafall_solver::SolverPlugin {
///         year: 2023,
///         day: 1,
///         solver: &Day1,
///         tags: &["easy"],
///     }
/// }
/// ```
pub struct SolverPlugin {
    pub year: u16,
    pub day: u8,
    pub solver: &'static dyn RegisterableSolver,
    /// Free-form labels the CLI filters on
    pub tags: &'static [&'static str],
}

inventory::collect!(SolverPlugin);

/// Collects factories, then freezes them into a [`SolverRegistry`].
///
/// ```no_run
/// use lavafall_solver::SolverRegistryBuilder;
///
/// let registry = SolverRegistryBuilder::new()
///     .register_solver_plugins(|plugin| plugin.year == 2023)
///     .unwrap()
///     .build();
/// ```
#[derive(Default)]
pub struct SolverRegistryBuilder {
    entries: BTreeMap<PuzzleId, FactoryEntry>,
}

impl SolverRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for one puzzle.
    ///
    /// Fails on an invalid year/day or when the puzzle already has a solver.
    pub fn register<F>(
        mut self,
        year: u16,
        day: u8,
        parts: u8,
        factory: F,
    ) -> Result<Self, RegistrationError>
    where
        F: for<'a> Fn(&'a str) -> Result<Box<dyn DynSolver + 'a>, ParseError>
            + Send
            + Sync
            + 'static,
    {
        let id = PuzzleId::new(year, day).ok_or(RegistrationError::InvalidYearDay(year, day))?;
        if self.entries.contains_key(&id) {
            return Err(RegistrationError::DuplicateSolver(year, day));
        }

        self.entries.insert(
            id,
            FactoryEntry {
                factory: boxed_factory(factory),
                parts,
            },
        );
        Ok(self)
    }

    /// Register a solver type directly, without going through `inventory`
    pub fn register_solver<S>(self, year: u16, day: u8) -> Result<Self, RegistrationError>
    where
        S: Solver + Sync + 'static,
    {
        self.register(year, day, S::PARTS, move |input| {
            create_instance::<S>(year, day, input)
        })
    }

    /// Register one collected plugin
    pub fn register_plugin(self, plugin: &SolverPlugin) -> Result<Self, RegistrationError> {
        let factory = plugin.solver.factory(plugin.year, plugin.day);
        self.register(plugin.year, plugin.day, plugin.solver.parts(), factory)
    }

    /// Register every plugin linked into the binary
    pub fn register_all_plugins(self) -> Result<Self, RegistrationError> {
        self.register_solver_plugins(|_| true)
    }

    /// Register the plugins `filter` accepts
    pub fn register_solver_plugins<F>(mut self, filter: F) -> Result<Self, RegistrationError>
    where
        F: Fn(&SolverPlugin) -> bool,
    {
        for plugin in inventory::iter::<SolverPlugin>() {
            if filter(plugin) {
                tracing::trace!(year = plugin.year, day = plugin.day, "registering plugin");
                self = self.register_plugin(plugin)?;
            }
        }
        Ok(self)
    }

    pub fn build(self) -> SolverRegistry {
        SolverRegistry {
            entries: self.entries,
        }
    }
}

/// Immutable lookup from puzzle to solver factory
pub struct SolverRegistry {
    entries: BTreeMap<PuzzleId, FactoryEntry>,
}

impl SolverRegistry {
    /// Parse `input` with the solver registered for `year`/`day`
    pub fn create_solver<'a>(
        &self,
        year: u16,
        day: u8,
        input: &'a str,
    ) -> Result<Box<dyn DynSolver + 'a>, SolverError> {
        let id = PuzzleId::new(year, day).ok_or(SolverError::InvalidYearDay(year, day))?;
        let entry = self
            .entries
            .get(&id)
            .ok_or(SolverError::NotFound(year, day))?;

        (entry.factory)(input).map_err(SolverError::ParseError)
    }

    /// Registered solvers in (year, day) order
    pub fn iter_info(&self) -> impl Iterator<Item = FactoryInfo> + '_ {
        self.entries.iter().map(|(id, entry)| FactoryInfo {
            year: id.year,
            day: id.day,
            parts: entry.parts,
        })
    }

    pub fn get_info(&self, year: u16, day: u8) -> Option<FactoryInfo> {
        let id = PuzzleId::new(year, day)?;
        self.entries.get(&id).map(|entry| FactoryInfo {
            year,
            day,
            parts: entry.parts,
        })
    }

    pub fn contains(&self, year: u16, day: u8) -> bool {
        self.get_info(year, day).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolveError;
    use crate::solver::AocParser;

    struct Summer;

    impl AocParser for Summer {
        type SharedData<'a> = Vec<u32>;

        fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
            input
                .split_whitespace()
                .map(|token| {
                    token
                        .parse()
                        .map_err(|_| ParseError::InvalidFormat(token.to_string()))
                })
                .collect()
        }
    }

    impl Solver for Summer {
        const PARTS: u8 = 2;

        fn solve_part(shared: &mut Self::SharedData<'_>, part: u8) -> Result<String, SolveError> {
            match part {
                1 => Ok(shared.iter().sum::<u32>().to_string()),
                2 => Ok(shared.iter().max().copied().unwrap_or_default().to_string()),
                _ => Err(SolveError::PartNotImplemented(part)),
            }
        }
    }

    #[test]
    fn test_create_and_solve() {
        let registry = SolverRegistryBuilder::new()
            .register_solver::<Summer>(2023, 1)
            .unwrap()
            .build();

        let mut solver = registry.create_solver(2023, 1, "3 4 5").unwrap();
        assert_eq!(solver.solve(1).unwrap().answer, "12");
        assert_eq!(solver.solve(2).unwrap().answer, "5");
        assert!(matches!(solver.solve(3), Err(SolveError::PartOutOfRange(3))));
    }

    #[test]
    fn test_duplicate_rejected() {
        let result = SolverRegistryBuilder::new()
            .register_solver::<Summer>(2023, 1)
            .unwrap()
            .register_solver::<Summer>(2023, 1);
        assert!(matches!(
            result,
            Err(RegistrationError::DuplicateSolver(2023, 1))
        ));
    }

    #[test]
    fn test_invalid_year_day_rejected() {
        let result = SolverRegistryBuilder::new().register_solver::<Summer>(2023, 26);
        assert!(matches!(
            result,
            Err(RegistrationError::InvalidYearDay(2023, 26))
        ));

        let registry = SolverRegistryBuilder::new().build();
        assert!(matches!(
            registry.create_solver(1999, 1, ""),
            Err(SolverError::InvalidYearDay(1999, 1))
        ));
        assert!(matches!(
            registry.create_solver(2023, 2, ""),
            Err(SolverError::NotFound(2023, 2))
        ));
    }

    #[test]
    fn test_parse_error_surfaces() {
        let registry = SolverRegistryBuilder::new()
            .register_solver::<Summer>(2023, 1)
            .unwrap()
            .build();
        assert!(matches!(
            registry.create_solver(2023, 1, "1 two"),
            Err(SolverError::ParseError(ParseError::InvalidFormat(_)))
        ));
    }

    #[test]
    fn test_info_in_chronological_order() {
        let registry = SolverRegistryBuilder::new()
            .register_solver::<Summer>(2023, 10)
            .unwrap()
            .register_solver::<Summer>(2022, 3)
            .unwrap()
            .register_solver::<Summer>(2023, 2)
            .unwrap()
            .build();

        let order: Vec<_> = registry.iter_info().map(|i| (i.year, i.day)).collect();
        assert_eq!(order, vec![(2022, 3), (2023, 2), (2023, 10)]);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get_info(2023, 10).map(|i| i.parts), Some(2));
    }
}
