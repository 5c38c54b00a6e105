use lavafall_solver::{
    AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError,
    SolverRegistryBuilder,
};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2019, day = 7, tags = ["macro-test", "words"])]
struct WordCount;

impl AocParser for WordCount {
    type SharedData<'a> = Vec<&'a str>;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        Ok(input.split_whitespace().collect())
    }
}

impl PartSolver<1> for WordCount {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.len().to_string())
    }
}

impl PartSolver<2> for WordCount {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared
            .iter()
            .max_by_key(|word| word.len())
            .map(|word| word.to_string())
            .ok_or_else(|| SolveError::failed(ParseError::MissingData("no words".into())))
    }
}

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 1)]
#[aoc(year = 2019, day = 8)]
struct Untagged;

impl AocParser for Untagged {
    type SharedData<'a> = ();

    fn parse(_input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        Ok(())
    }
}

impl PartSolver<1> for Untagged {
    fn solve(_shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok("done".to_string())
    }
}

#[test]
fn test_plugin_registered_with_tags() {
    let registry = SolverRegistryBuilder::new()
        .register_solver_plugins(|plugin| plugin.tags.contains(&"macro-test"))
        .unwrap()
        .build();

    assert!(registry.contains(2019, 7));
    assert!(!registry.contains(2019, 8));

    let mut solver = registry
        .create_solver(2019, 7, "the quick brownest fox")
        .unwrap();
    assert_eq!(solver.parts(), 2);
    assert_eq!(solver.solve(1).unwrap().answer, "4");
    assert_eq!(solver.solve(2).unwrap().answer, "brownest");
}

#[test]
fn test_all_plugins_include_untagged() {
    let registry = SolverRegistryBuilder::new()
        .register_all_plugins()
        .unwrap()
        .build();

    let info = registry.get_info(2019, 8).unwrap();
    assert_eq!(info.parts, 1);
    let mut solver = registry.create_solver(2019, 8, "").unwrap();
    assert_eq!(solver.solve(1).unwrap().answer, "done");
}
