use serde::{Deserialize, Serialize};
use std::fmt;

/// Grid position as (column, row). Identity of a search state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub col: i32,
    pub row: i32,
}

impl Coordinate {
    pub const fn new(col: i32, row: i32) -> Self {
        Coordinate { col, row }
    }

    /// Neighbour in `direction`, or `None` past the `i32` range.
    pub fn offset(self, direction: Direction) -> Option<Self> {
        let (d_col, d_row) = direction.delta();
        Some(Coordinate::new(
            self.col.checked_add(d_col)?,
            self.row.checked_add(d_row)?,
        ))
    }

    /// True if `other` is one of the 8 neighbours of `self`.
    pub fn is_adjacent(self, other: Coordinate) -> bool {
        let d_col = (i64::from(self.col) - i64::from(other.col)).abs();
        let d_row = (i64::from(self.row) - i64::from(other.row)).abs();
        d_col <= 1 && d_row <= 1 && (d_col, d_row) != (0, 0)
    }
}

impl From<(i32, i32)> for Coordinate {
    fn from((col, row): (i32, i32)) -> Self {
        Coordinate::new(col, row)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    Empty,
    Start,
    Blocked,
    Goal,
    Runner,
    Trail,
}

impl CellType {
    /// Cells a successor may land on. Start is only ever the origin.
    pub fn is_traversable(self) -> bool {
        matches!(self, CellType::Empty | CellType::Goal)
    }

    pub fn symbol(self) -> char {
        match self {
            CellType::Empty => '.',
            CellType::Start => 'S',
            CellType::Blocked => '@',
            CellType::Goal => 'G',
            CellType::Runner => 'o',
            CellType::Trail => '*',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(CellType::Empty),
            'S' => Some(CellType::Start),
            '@' | 'T' | '#' => Some(CellType::Blocked),
            'G' => Some(CellType::Goal),
            'o' => Some(CellType::Runner),
            '*' => Some(CellType::Trail),
            _ => None,
        }
    }
}

/// The 8 move directions, in expansion order. Row grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// (Δcol, Δrow)
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }
}

/// A single move. Every move costs the same, diagonal or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub direction: Direction,
    pub target: Coordinate,
    pub cost: u32,
}

impl Action {
    pub const STEP_COST: u32 = 1;

    pub(crate) fn step(from: Coordinate, direction: Direction) -> Option<Self> {
        Some(Action {
            direction,
            target: from.offset(direction)?,
            cost: Self::STEP_COST,
        })
    }
}

/// Steps from the cell after start up to and including the goal.
pub type Path = Vec<Coordinate>;
