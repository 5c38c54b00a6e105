//! Immutable row-major grid plus the heading vocabulary the searches share

use crate::utils::error::GridError;
use glam::IVec2;

/// Integer `(x, y)` cell coordinate; `x` grows right, `y` grows down
pub type Position = IVec2;

/// One of the four orthogonal directions of travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Heading {
    Up,
    Right,
    Down,
    Left,
}

/// Orientation a heading travels along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::Up, Heading::Right, Heading::Down, Heading::Left];

    /// Unit step in this heading
    pub const fn offset(self) -> IVec2 {
        match self {
            Heading::Up => IVec2::NEG_Y,
            Heading::Right => IVec2::X,
            Heading::Down => IVec2::Y,
            Heading::Left => IVec2::NEG_X,
        }
    }

    pub const fn opposite(self) -> Heading {
        match self {
            Heading::Up => Heading::Down,
            Heading::Right => Heading::Left,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
        }
    }

    /// The two perpendicular headings, i.e. every legal 90° turn
    pub const fn turns(self) -> [Heading; 2] {
        match self.axis() {
            Axis::Horizontal => [Heading::Up, Heading::Down],
            Axis::Vertical => [Heading::Left, Heading::Right],
        }
    }

    pub const fn axis(self) -> Axis {
        match self {
            Heading::Up | Heading::Down => Axis::Vertical,
            Heading::Left | Heading::Right => Axis::Horizontal,
        }
    }

    /// Parse the `U`/`R`/`D`/`L` letters dig plans and move lists use
    pub fn from_letter(letter: char) -> Option<Heading> {
        match letter {
            'U' => Some(Heading::Up),
            'R' => Some(Heading::Right),
            'D' => Some(Heading::Down),
            'L' => Some(Heading::Left),
            _ => None,
        }
    }
}

/// Rectangular grid of cells stored row by row.
///
/// Rows all have the same length; every constructor enforces it. Lookups take
/// a [`Position`] and never wrap: anything outside `[0, width) x [0, height)`
/// is `None` from [`Grid::get`] and [`GridError::OutOfBounds`] from
/// [`Grid::cell_at`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Build a grid from text, one row per line.
    ///
    /// Trailing whitespace of the whole input is ignored. `cell` maps each
    /// character; a `None` is reported as [`GridError::InvalidCell`] with
    /// 1-based line and column.
    ///
    /// ```
    /// use lavafall_solutions::utils::Grid;
    ///
    /// let grid = Grid::parse("12\n34", |c| c.to_digit(10)).unwrap();
    /// assert_eq!(grid.dimensions(), (2, 2));
    /// ```
    pub fn parse<F>(input: &str, mut cell: F) -> Result<Self, GridError>
    where
        F: FnMut(char) -> Option<T>,
    {
        let mut width = None;
        let mut height = 0;
        let mut cells = Vec::with_capacity(input.len());

        for (row, line) in input.trim_end().lines().enumerate() {
            let line = line.trim_end_matches('\r');
            let before = cells.len();
            for (column, c) in line.chars().enumerate() {
                let value = cell(c).ok_or(GridError::InvalidCell {
                    row: row + 1,
                    column: column + 1,
                    found: c,
                })?;
                cells.push(value);
            }

            let found = cells.len() - before;
            match width {
                None => width = Some(found),
                Some(expected) if expected != found => {
                    return Err(GridError::Ragged {
                        row: row + 1,
                        expected,
                        found,
                    });
                }
                Some(_) => {}
            }
            height += 1;
        }

        match width {
            Some(width) if width > 0 => Ok(Self {
                width,
                height,
                cells,
            }),
            _ => Err(GridError::Empty),
        }
    }

    /// Build a grid from already split rows
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, GridError> {
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(GridError::Empty);
        }
        let height = rows.len();

        let mut cells = Vec::with_capacity(width * height);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != width {
                return Err(GridError::Ragged {
                    row: row + 1,
                    expected: width,
                    found: values.len(),
                });
            }
            cells.extend(values);
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build a `width x height` grid whose cells are `f(position)`
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(Position) -> T,
    {
        let cells = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| f(IVec2::new(x as i32, y as i32)))
            .collect();

        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    pub fn get(&self, pos: Position) -> Option<&T> {
        self.index(pos).map(|i| &self.cells[i])
    }

    /// Bounds-checked lookup that reports where the access went wrong
    pub fn cell_at(&self, pos: Position) -> Result<&T, GridError> {
        self.get(pos).ok_or(GridError::OutOfBounds {
            position: pos,
            width: self.width,
            height: self.height,
        })
    }

    /// Every position, row by row
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<T> {
        let width = self.width as i32;
        (0..self.height as i32).flat_map(move |y| (0..width).map(move |x| IVec2::new(x, y)))
    }

    /// Every cell with its position, row by row
    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> {
        self.positions().zip(self.cells.iter())
    }

    /// First position (row by row) whose cell matches
    pub fn find<P>(&self, mut predicate: P) -> Option<Position>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter()
            .find(|(_, cell)| predicate(cell))
            .map(|(pos, _)| pos)
    }

    /// In-bounds orthogonal neighbours of `pos` with the heading leading there
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = (Heading, Position)> + '_ {
        Heading::ALL
            .into_iter()
            .map(move |heading| (heading, pos + heading.offset()))
            .filter(|&(_, next)| self.contains(next))
    }

    pub fn row(&self, y: usize) -> Option<&[T]> {
        (y < self.height).then(|| &self.cells[y * self.width..(y + 1) * self.width])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.width)
    }

    /// Cells of column `x`, top to bottom; empty past the right edge
    pub fn column(&self, x: usize) -> impl Iterator<Item = &T> {
        let start = if x < self.width { x } else { self.cells.len() };
        self.cells.iter().skip(start).step_by(self.width)
    }

    pub fn map<U, F>(&self, mut f: F) -> Grid<U>
    where
        F: FnMut(&T) -> U,
    {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(&mut f).collect(),
        }
    }
}

impl<T: Clone> Grid<T> {
    /// Copy of the grid surrounded by one ring of `sentinel`.
    ///
    /// The result is two cells wider and taller and every original cell
    /// moves by `(1, 1)`, so searches can step off the original edge without
    /// a bounds branch.
    pub fn with_border(&self, sentinel: T) -> Grid<T> {
        Grid::from_fn(self.width + 2, self.height + 2, |pos| {
            self.get(pos - IVec2::ONE)
                .cloned()
                .unwrap_or_else(|| sentinel.clone())
        })
    }

    /// Copy rotated a quarter turn.
    ///
    /// With `m[row][col]` the original, clockwise places `m[i][j]` at
    /// `[j][rows - 1 - i]` and counter-clockwise at `[cols - 1 - j][i]`.
    pub fn rotated(&self, clockwise: bool) -> Grid<T> {
        let (rows, cols) = (self.height as i32, self.width as i32);
        Grid::from_fn(self.height, self.width, |pos| {
            let source = if clockwise {
                IVec2::new(pos.y, rows - 1 - pos.x)
            } else {
                IVec2::new(cols - 1 - pos.y, pos.x)
            };
            self.cells[(source.y * cols + source.x) as usize].clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chars(input: &str) -> Grid<char> {
        Grid::parse(input, Some).unwrap()
    }

    #[test]
    fn test_parse_dimensions_and_lookup() {
        let grid = chars("abc\ndef\n");
        assert_eq!(grid.dimensions(), (3, 2));
        assert_eq!(grid.get(IVec2::new(2, 1)), Some(&'f'));
        assert_eq!(grid.cell_at(IVec2::new(0, 0)), Ok(&'a'));
        assert_eq!(grid.row(1), Some(&['d', 'e', 'f'][..]));
        assert_eq!(grid.column(1).copied().collect::<String>(), "be");
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert_eq!(
            Grid::parse("abc\nde", Some),
            Err(GridError::Ragged {
                row: 2,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(Grid::parse("\n\n", Some), Err(GridError::Empty));
        assert_eq!(
            Grid::parse("12\n3x", |c| c.to_digit(10)),
            Err(GridError::InvalidCell {
                row: 2,
                column: 2,
                found: 'x'
            })
        );
    }

    #[test]
    fn test_out_of_bounds_is_reported() {
        let grid = chars("ab\ncd");
        for pos in [IVec2::new(-1, 0), IVec2::new(2, 0), IVec2::new(0, 2)] {
            assert!(grid.get(pos).is_none());
            assert_eq!(
                grid.cell_at(pos),
                Err(GridError::OutOfBounds {
                    position: pos,
                    width: 2,
                    height: 2
                })
            );
        }
    }

    #[test]
    fn test_neighbors_stay_in_bounds() {
        let grid = chars("ab\ncd");
        let around: Vec<_> = grid.neighbors(IVec2::ZERO).collect();
        assert_eq!(
            around,
            vec![
                (Heading::Right, IVec2::new(1, 0)),
                (Heading::Down, IVec2::new(0, 1))
            ]
        );
    }

    #[test]
    fn test_with_border_shifts_cells() {
        let grid = chars("ab\ncd").with_border('#');
        assert_eq!(grid.dimensions(), (4, 4));
        assert_eq!(grid.rows().next(), Some(&['#'; 4][..]));
        assert_eq!(grid.get(IVec2::new(1, 1)), Some(&'a'));
        assert_eq!(grid.get(IVec2::new(2, 2)), Some(&'d'));
        assert_eq!(grid.get(IVec2::new(3, 2)), Some(&'#'));
    }

    #[test]
    fn test_rotation() {
        let grid = chars("abc\ndef");
        assert_eq!(grid.rotated(true), chars("da\neb\nfc"));
        assert_eq!(grid.rotated(false), chars("cf\nbe\nad"));
    }

    #[test]
    fn test_heading_relations() {
        for heading in Heading::ALL {
            assert_eq!(heading.opposite().opposite(), heading);
            assert_eq!(heading.offset() + heading.opposite().offset(), IVec2::ZERO);
            for turn in heading.turns() {
                assert_ne!(turn.axis(), heading.axis());
            }
        }
    }

    fn arb_grid() -> impl Strategy<Value = Grid<u8>> {
        (1usize..8, 1usize..8).prop_flat_map(|(w, h)| {
            proptest::collection::vec(any::<u8>(), w * h).prop_map(move |cells| Grid {
                width: w,
                height: h,
                cells,
            })
        })
    }

    proptest! {
        #[test]
        fn prop_every_in_range_cell_is_defined(grid in arb_grid(), x in -3i32..12, y in -3i32..12) {
            let pos = IVec2::new(x, y);
            let inside = x >= 0 && y >= 0 && (x as usize) < grid.width() && (y as usize) < grid.height();
            prop_assert_eq!(grid.cell_at(pos).is_ok(), inside);
            prop_assert_eq!(grid.contains(pos), inside);
        }

        #[test]
        fn prop_border_returns_sentinel_outside_original(grid in arb_grid(), x in -1i32..9, y in -1i32..9) {
            let bordered = grid.with_border(0xFF);
            let pos = IVec2::new(x, y);
            match grid.get(pos) {
                Some(value) => prop_assert_eq!(bordered.get(pos + IVec2::ONE), Some(value)),
                None if bordered.contains(pos + IVec2::ONE) => {
                    prop_assert_eq!(bordered.get(pos + IVec2::ONE), Some(&0xFF))
                }
                None => {}
            }
        }

        #[test]
        fn prop_rotations_undo_each_other(grid in arb_grid()) {
            prop_assert_eq!(grid.rotated(true).rotated(false), grid.clone());
            let full_turn = grid.rotated(true).rotated(true).rotated(true).rotated(true);
            prop_assert_eq!(full_turn, grid);
        }
    }
}
