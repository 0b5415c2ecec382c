//! Grid coordinates and the four compass moves.

use std::fmt;

/// A cell on the grid, addressed by (row, col).
///
/// Ordering is row-major, so maps keyed by `Position` iterate top to bottom,
/// left to right.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Returns the neighbouring cell in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.offset();
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// Returns the four neighbours in canonical direction order.
    pub fn neighbors(self) -> impl Iterator<Item = (Direction, Self)> {
        Direction::all().into_iter().map(move |d| (d, self.step(d)))
    }

    #[must_use]
    pub const fn manhattan(self, other: Self) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Replays `path` from this position and returns where it ends.
    #[must_use]
    pub fn follow(self, path: &[Direction]) -> Self {
        path.iter().fold(self, |pos, &d| pos.step(d))
    }

    /// Translates a position from this frame into one whose origin is `origin`.
    #[must_use]
    pub const fn relative_to(self, origin: Self) -> Self {
        Self {
            row: self.row - origin.row,
            col: self.col - origin.col,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four grid moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Canonical iteration order, used for every deterministic tie-break.
    #[must_use]
    pub const fn all() -> [Direction; 4] {
        [Self::North, Self::East, Self::South, Self::West]
    }

    /// Returns the (row, col) delta of a single move.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (-1, 0),
            Self::East => (0, 1),
            Self::South => (1, 0),
            Self::West => (0, -1),
        }
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Position of this direction in the canonical order.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// Single-letter code used in move logs.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::North => 'N',
            Self::East => 'E',
            Self::South => 'S',
            Self::West => 'W',
        }
    }
}

/// The single decision a controller emits per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    /// Stay in place: cleans away from the dock, recharges on it.
    Stay,
    /// Ends the run.
    Finish,
}

impl Action {
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Move(d) => d.as_char(),
            Self::Stay => 's',
            Self::Finish => 'F',
        }
    }
}
