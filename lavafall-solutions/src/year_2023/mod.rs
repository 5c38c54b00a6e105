//! 2023 puzzles

pub mod day_8;
pub mod day_9;
pub mod day_10;
pub mod day_11;
pub mod day_13;
pub mod day_16;
pub mod day_17;
pub mod day_18;
pub mod day_21;
pub mod day_23;

#[cfg(test)]
pub(crate) fn solve_example<S: lavafall_solver::Solver>(input: &str, part: u8) -> String {
    let mut shared = <S as lavafall_solver::AocParser>::parse(input).unwrap();
    S::solve_part(&mut shared, part).unwrap()
}
