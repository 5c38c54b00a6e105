//! Lattice-polygon area via the shoelace formula and Pick's theorem
//!
//! Every function takes the vertices of a closed polygon in order; the edge
//! from the last vertex back to the first is implied. Areas are carried as
//! doubled integers so half cells never round.

use crate::utils::sequence::gcd;
use glam::I64Vec2;

/// Twice the enclosed area (shoelace), always non-negative
pub fn double_area(vertices: &[I64Vec2]) -> i64 {
    closed_edges(vertices)
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum::<i64>()
        .abs()
}

/// Lattice points on the boundary
pub fn boundary_points(vertices: &[I64Vec2]) -> i64 {
    closed_edges(vertices)
        .map(|(a, b)| {
            let step = b - a;
            gcd(step.x.unsigned_abs(), step.y.unsigned_abs()) as i64
        })
        .sum()
}

/// Lattice points strictly inside: `A - b/2 + 1`
pub fn interior_points(vertices: &[I64Vec2]) -> i64 {
    (double_area(vertices) - boundary_points(vertices) + 2) / 2
}

/// Unit cells covered when each vertex is a cell centre and the boundary
/// itself is one cell thick: interior plus boundary, `A + b/2 + 1`
pub fn covered_cells(vertices: &[I64Vec2]) -> i64 {
    (double_area(vertices) + boundary_points(vertices) + 2) / 2
}

fn closed_edges(vertices: &[I64Vec2]) -> impl Iterator<Item = (I64Vec2, I64Vec2)> + '_ {
    vertices
        .iter()
        .copied()
        .zip(vertices.iter().copied().cycle().skip(1))
}
