//! Grid coordinate value type and 4-neighbour enumeration.
//!
//! `Position` is `Copy` and never mutated in place: every robot move produces
//! a new value and the old one is simply dropped, so a robot's current and
//! previous positions can never alias each other.

use std::fmt;

/// One of the four cardinal moves, in the fixed enumeration order used by
/// every neighbour scan in the workspace.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// `[Up, Down, Left, Right]`; pathfinders rely on this order for
    /// reproducible tie-breaking.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];
}

/// A `(row, col)` cell coordinate on the campus grid.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan (L1) distance in cells.
    #[inline]
    pub fn manhattan(self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// The neighbouring cell one step in `dir`, or `None` if that step would
    /// leave the `rows × cols` rectangle.
    #[inline]
    pub fn step(self, dir: Direction, rows: usize, cols: usize) -> Option<Position> {
        let next = match dir {
            Direction::Up    => Position::new(self.row.checked_sub(1)?, self.col),
            Direction::Down  => Position::new(self.row + 1, self.col),
            Direction::Left  => Position::new(self.row, self.col.checked_sub(1)?),
            Direction::Right => Position::new(self.row, self.col + 1),
        };
        (next.row < rows && next.col < cols).then_some(next)
    }

    /// In-bounds 4-neighbours in `[up, down, left, right]` order.
    ///
    /// No heap allocation: the candidates live in a fixed-size array.
    pub fn neighbors(self, rows: usize, cols: usize) -> impl Iterator<Item = Position> {
        Direction::ALL
            .map(|dir| self.step(dir, rows, cols))
            .into_iter()
            .flatten()
    }

    /// `true` if `self` lies inside the inclusive box spanned by `a` and `b`.
    #[inline]
    pub fn within_box(self, a: Position, b: Position) -> bool {
        let (r0, r1) = (a.row.min(b.row), a.row.max(b.row));
        let (c0, c1) = (a.col.min(b.col), a.col.max(b.col));
        (r0..=r1).contains(&self.row) && (c0..=c1).contains(&self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
