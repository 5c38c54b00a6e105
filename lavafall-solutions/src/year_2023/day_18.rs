use crate::utils::Heading;
use crate::utils::polygon::covered_cells;
use anyhow::{Context, anyhow};
use glam::I64Vec2;
use lavafall_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 18, tags = ["polygon"])]
pub struct Solver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Dig {
    heading: Heading,
    meters: i64,
}

/// Both readings of one dig plan line
#[derive(Debug)]
pub struct DigPlan {
    written: Vec<Dig>,
    encoded: Vec<Dig>,
}

/// Cubic meters the lagoon holds once the trench interior is dug out
fn lagoon_volume(plan: &[Dig]) -> i64 {
    let corners: Vec<I64Vec2> = plan
        .iter()
        .scan(I64Vec2::ZERO, |corner, dig| {
            *corner += dig.heading.offset().as_i64vec2() * dig.meters;
            Some(*corner)
        })
        .collect();
    covered_cells(&corners)
}

fn parse_line(line: &str) -> anyhow::Result<(Dig, Dig)> {
    let mut fields = line.split_whitespace();
    let heading = fields
        .next()
        .and_then(|f| f.chars().next())
        .and_then(Heading::from_letter)
        .context("expected a U/R/D/L heading")?;
    let meters = fields.next().context("missing distance")?.parse()?;
    let color = fields
        .next()
        .and_then(|f| f.strip_prefix("(#"))
        .and_then(|f| f.strip_suffix(')'))
        .filter(|hex| hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit()))
        .context("expected a color like (#70c710)")?;

    let encoded_meters = i64::from_str_radix(&color[..5], 16)?;
    let encoded_heading = match &color[5..] {
        "0" => Heading::Right,
        "1" => Heading::Down,
        "2" => Heading::Left,
        "3" => Heading::Up,
        other => return Err(anyhow!("unknown heading digit {other:?}")),
    };

    Ok((
        Dig { heading, meters },
        Dig {
            heading: encoded_heading,
            meters: encoded_meters,
        },
    ))
}

impl AocParser for Solver {
    type SharedData<'a> = DigPlan;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        input
            .trim()
            .lines()
            .enumerate()
            .map(|(line_idx, line)| {
                parse_line(line).map_err(|e| anyhow!("(line {}) {}", line_idx + 1, e))
            })
            .collect::<anyhow::Result<(Vec<_>, Vec<_>)>>()
            .map(|(written, encoded)| DigPlan { written, encoded })
            .map_err(|e| ParseError::InvalidFormat(e.to_string()))
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(lagoon_volume(&shared.written).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(lagoon_volume(&shared.encoded).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::year_2023::solve_example;

    const EXAMPLE: &str = "\
R 6 (#70c710)
D 5 (#0dc571)
L 2 (#5713f0)
D 2 (#d2c081)
R 2 (#59c680)
D 2 (#411b91)
L 5 (#8ceee2)
U 2 (#caa173)
L 1 (#1b58a2)
U 2 (#caa171)
R 2 (#7807d2)
U 3 (#a77fa3)
L 2 (#015232)
U 2 (#7a21e3)";

    #[test]
    fn test_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 1), "62");
        assert_eq!(solve_example::<Solver>(EXAMPLE, 2), "952408144115");
    }

    #[test]
    fn test_color_decodes_to_dig() {
        let (_, encoded) = parse_line("R 6 (#70c710)").unwrap();
        assert_eq!(
            encoded,
            Dig {
                heading: Heading::Right,
                meters: 461937
            }
        );
    }

    #[test]
    fn test_non_hex_color_rejected() {
        for line in ["R 6 (#\u{e9}\u{e9}\u{e9})", "R 6 (#70c71g)", "R 6 (#70c71)"] {
            assert!(
                matches!(Solver::parse(line), Err(ParseError::InvalidFormat(_))),
                "{line}"
            );
        }
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let err = Solver::parse("R 6 (#70c710)\nX 1 (#000000)").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
