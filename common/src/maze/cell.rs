use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// One of the four sides of a cell.
///
/// The numeric codes follow a phone keypad: 8 is up, 2 is down, 4 is left
/// and 6 is right, so opposite directions always sum to ten.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Direction {
    Down,
    Left,
    Right,
    Up,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Direction::Down => 2,
            Direction::Left => 4,
            Direction::Right => 6,
            Direction::Up => 8,
        }
    }

    pub fn from_code(code: u8) -> Option<Direction> {
        match code {
            2 => Some(Direction::Down),
            4 => Some(Direction::Left),
            6 => Some(Direction::Right),
            8 => Some(Direction::Up),
            _ => None,
        }
    }

    /// The two directions perpendicular to this one.
    pub fn turns(self) -> [Direction; 2] {
        match self {
            Direction::Down | Direction::Up => [Direction::Left, Direction::Right],
            Direction::Left | Direction::Right => [Direction::Down, Direction::Up],
        }
    }

    pub(crate) fn bit(self) -> u8 {
        match self {
            Direction::Down => 0b0001,
            Direction::Left => 0b0010,
            Direction::Right => 0b0100,
            Direction::Up => 0b1000,
        }
    }

    fn delta(self) -> (isize, isize) {
        match self {
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::Up => (-1, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    pub fn squared_distance(&self, other: &Position) -> usize {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        dr * dr + dc * dc
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The cell one step from `position` in `direction`, if it lies inside a
/// `length` by `length` grid.
pub fn neighbor_in_direction(
    position: Position,
    direction: Direction,
    length: usize,
) -> Option<Position> {
    let (dr, dc) = direction.delta();
    let row = position.row.checked_add_signed(dr)?;
    let col = position.col.checked_add_signed(dc)?;

    if row < length && col < length {
        Some(Position::new(row, col))
    } else {
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Normal,
    Start,
    End,
}

/// An outgoing entry in a cell's link list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Link {
    /// A tree edge to the child discovered in `direction`. The weight is in
    /// `0..=9` and is not used by generation itself.
    Edge { direction: Direction, weight: u8 },
    Finish,
    DeadEnd,
}

impl Link {
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Link::Edge { direction, .. } => Some(*direction),
            Link::Finish | Link::DeadEnd => None,
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Link::Edge { direction, .. } => write!(f, "{}", direction.code()),
            Link::Finish => f.write_str("F"),
            Link::DeadEnd => f.write_str("D"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    position: Position,
    pub(crate) visited: bool,
    pub(crate) parent_direction: Option<Direction>,
    role: Role,
    pub(crate) links: Vec<Link>,
}

impl Cell {
    pub fn new(position: Position, role: Role) -> Self {
        Cell {
            position,
            visited: false,
            parent_direction: None,
            role,
            links: Vec::new(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    /// Points back toward the cell that discovered this one. For the start
    /// cell it points out of the grid through the entrance instead.
    pub fn parent_direction(&self) -> Option<Direction> {
        self.parent_direction
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_start(&self) -> bool {
        self.role == Role::Start
    }

    pub fn is_end(&self) -> bool {
        self.role == Role::End
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Directions of this cell's children.
    pub fn link_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.links.iter().filter_map(Link::direction)
    }

    pub fn has_link(&self, direction: Direction) -> bool {
        self.link_directions().any(|d| d == direction)
    }

    pub fn is_finish(&self) -> bool {
        self.links.contains(&Link::Finish)
    }

    pub fn is_deadend_marked(&self) -> bool {
        self.links.contains(&Link::DeadEnd)
    }

    /// The cell has been expanded at least once.
    pub(crate) fn is_expanded(&self) -> bool {
        !self.links.is_empty()
    }

    /// Parent direction as seen by traversal. The start cell's entrance is
    /// not a tree edge.
    pub(crate) fn tree_parent(&self) -> Option<Direction> {
        if self.is_start() {
            None
        } else {
            self.parent_direction
        }
    }
}
