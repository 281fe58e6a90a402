//! Which sides of a cell a renderer should leave open.
//!
//! A cell is open toward each of its children and toward its parent. Every
//! cell of a finished maze has at least one open side, so the mask takes one
//! of fifteen values.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use super::cell::{Cell, Direction};

pub const PATTERN_COUNT: u8 = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WallPattern(u8);

impl WallPattern {
    pub fn from_open_sides(sides: impl IntoIterator<Item = Direction>) -> Self {
        WallPattern(sides.into_iter().fold(0, |mask, side| mask | side.bit()))
    }

    /// 1 to 15 for any cell with an open side, 0 for a fully walled one.
    pub fn id(&self) -> u8 {
        self.0
    }

    pub fn is_open(&self, side: Direction) -> bool {
        self.0 & side.bit() != 0
    }

    pub fn open_sides(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::iter().filter(|&side| self.is_open(side))
    }

    pub fn walls(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::iter().filter(|&side| !self.is_open(side))
    }
}

/// The start's parent direction is its entrance, so the entrance shows up as
/// an open side like any other.
pub fn wall_pattern(cell: &Cell) -> WallPattern {
    WallPattern::from_open_sides(cell.link_directions().chain(cell.parent_direction()))
}
