pub mod algorithms;

use std::fmt;

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strum::IntoEnumIterator;

use super::{
    Maze,
    cell::{Cell, Direction, Link, Position, Role, neighbor_in_direction},
};
use crate::constants::{DEFAULT_STRAIGHT_BIAS, DEFAULT_WALL_HUG_BIAS};
use algorithms::backtrack::Backtrack;

pub const MIN_LENGTH: usize = 2;
pub const MIN_PATH_LENGTH: usize = 3;
pub const MAX_WEIGHT: u8 = 9;

// Rejections allowed before the end is drawn from the side opposite the start.
const MAX_END_ATTEMPTS: usize = 32;

/// Shape knobs for the corridor walk. Neither affects correctness.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    /// Chance of carrying straight on, away from the parent, when a turn is
    /// also possible.
    pub straight_bias: f64,
    /// Chance of turning toward the side that is closed on the parent when
    /// exactly one of the two turns is.
    pub wall_hug_bias: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            straight_bias: DEFAULT_STRAIGHT_BIAS,
            wall_hug_bias: DEFAULT_WALL_HUG_BIAS,
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<(), ParameterError> {
        for (name, value) in [
            ("straight_bias", self.straight_bias),
            ("wall_hug_bias", self.wall_hug_bias),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ParameterError::BiasOutOfRange { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ParameterError {
    PathLengthTooShort { path_length: usize },
    BiasOutOfRange { name: &'static str, value: f64 },
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterError::PathLengthTooShort { path_length } => write!(
                f,
                "path length must be at least {}, got {}",
                MIN_PATH_LENGTH, path_length
            ),
            ParameterError::BiasOutOfRange { name, value } => {
                write!(f, "{} must lie in [0, 1], got {}", name, value)
            }
        }
    }
}

impl std::error::Error for ParameterError {}

#[derive(Clone, Debug, PartialEq)]
pub enum GenerationError {
    InvalidSize { length: usize },
    InvalidParameter(ParameterError),
    /// Unvisited cells remain but nothing is left to grow from.
    InternalInvariant { unvisited: usize },
    AlreadyGenerated,
    NotGenerated,
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::InvalidSize { length } => write!(
                f,
                "grid length must be at least {}, got {}",
                MIN_LENGTH, length
            ),
            GenerationError::InvalidParameter(error) => write!(f, "invalid parameter: {}", error),
            GenerationError::InternalInvariant { unvisited } => write!(
                f,
                "no cell left to grow from with {} cells still unvisited",
                unvisited
            ),
            GenerationError::AlreadyGenerated => {
                f.write_str("grid has already been through a generation; build a new one")
            }
            GenerationError::NotGenerated => f.write_str("grid has not been generated yet"),
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerationError::InvalidParameter(error) => Some(error),
            _ => None,
        }
    }
}

impl From<ParameterError> for GenerationError {
    fn from(error: ParameterError) -> Self {
        GenerationError::InvalidParameter(error)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Fresh,
    Generated,
    Failed,
}

/// A `length` by `length` grid of cells grown into a spanning tree rooted at
/// a border cell.
pub struct GridGraph {
    length: usize,
    seed: u64,
    cells: Vec<Cell>,
    start: Position,
    end: Position,
    entrance: Direction,
    exit: Direction,
    // Visited cells waiting to be expanded, discovered by the corridor walk.
    frontier: Vec<Position>,
    // Visited cells waiting to be expanded, budded off during resumption.
    on_hold: Vec<Position>,
    // Candidates for resumption. Fully explored cells are dropped from it.
    visited: Vec<Position>,
    unvisited: usize,
    rng: ChaCha8Rng,
    tuning: Tuning,
    phase: Phase,
}

impl GridGraph {
    pub fn new_grid(length: usize, seed: u64) -> Result<Self, GenerationError> {
        if length < MIN_LENGTH {
            return Err(GenerationError::InvalidSize { length });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (start, entrance, end, exit) = choose_start_end(length, &mut rng);

        let mut cells = Vec::with_capacity(length * length);
        for row in 0..length {
            for col in 0..length {
                let position = Position::new(row, col);
                let role = if position == start {
                    Role::Start
                } else if position == end {
                    Role::End
                } else {
                    Role::Normal
                };
                cells.push(Cell::new(position, role));
            }
        }

        debug!(
            "new {}x{} grid (seed {}): start {} entering {}, end {} leaving {}",
            length, length, seed, start, entrance, end, exit
        );

        Ok(GridGraph {
            length,
            seed,
            cells,
            start,
            end,
            entrance,
            exit,
            frontier: Vec::new(),
            on_hold: Vec::new(),
            visited: Vec::new(),
            unvisited: length * length,
            rng,
            tuning: Tuning::default(),
            phase: Phase::Fresh,
        })
    }

    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Grows the maze in place. On failure the grid is spent and must be
    /// rebuilt; invalid parameters leave it untouched.
    pub fn generate(&mut self, path_length: usize, bud_count: usize) -> Result<(), GenerationError> {
        if self.phase != Phase::Fresh {
            return Err(GenerationError::AlreadyGenerated);
        }
        if path_length < MIN_PATH_LENGTH {
            return Err(ParameterError::PathLengthTooShort { path_length }.into());
        }
        self.tuning.validate()?;

        debug!(
            "generating {}x{} maze: path length {}, bud count {}, {:?}",
            self.length, self.length, path_length, bud_count, self.tuning
        );

        match self.backtrack(path_length, bud_count) {
            Ok(()) => {
                self.phase = Phase::Generated;
                debug!("maze complete: {} cells visited", self.cells.len());
                Ok(())
            }
            Err(error) => {
                self.phase = Phase::Failed;
                Err(error)
            }
        }
    }

    pub fn into_maze(self) -> Result<Maze, GenerationError> {
        if self.phase != Phase::Generated {
            return Err(GenerationError::NotGenerated);
        }

        Ok(Maze {
            length: self.length,
            seed: self.seed,
            cells: self.cells,
            start: self.start,
            end: self.end,
            entrance: self.entrance,
            exit: self.exit,
        })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tuning(&self) -> Tuning {
        self.tuning
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < self.length && col < self.length {
            Some(&self.cells[row * self.length + col])
        } else {
            None
        }
    }

    pub fn start_coord(&self) -> Position {
        self.start
    }

    pub fn end_coord(&self) -> Position {
        self.end
    }

    /// Outward side of the start cell.
    pub fn entrance(&self) -> Direction {
        self.entrance
    }

    /// Outward side of the end cell.
    pub fn exit(&self) -> Direction {
        self.exit
    }

    pub fn is_fully_visited(&self) -> bool {
        self.unvisited == 0
    }

    pub fn unvisited_count(&self) -> usize {
        self.unvisited
    }

    pub fn frontier(&self) -> &[Position] {
        &self.frontier
    }

    pub fn on_hold(&self) -> &[Position] {
        &self.on_hold
    }

    /// Corners have two, edges three and interior cells four.
    pub fn accessible_directions(&self, position: Position) -> Vec<Direction> {
        let last = self.length - 1;

        Direction::iter()
            .filter(|direction| match direction {
                Direction::Up => position.row != 0,
                Direction::Down => position.row != last,
                Direction::Left => position.col != 0,
                Direction::Right => position.col != last,
            })
            .collect()
    }

    pub fn neighbor(&self, position: Position, direction: Direction) -> Option<Position> {
        neighbor_in_direction(position, direction, self.length)
    }

    /// Every accessible neighbor has been visited, whoever claimed it.
    pub fn is_fully_explored(&self, position: Position) -> bool {
        self.accessible_directions(position)
            .into_iter()
            .filter_map(|direction| self.neighbor(position, direction))
            .all(|neighbor| self.cell(neighbor).visited)
    }

    fn cell(&self, position: Position) -> &Cell {
        &self.cells[position.row * self.length + position.col]
    }

    fn cell_mut(&mut self, position: Position) -> &mut Cell {
        &mut self.cells[position.row * self.length + position.col]
    }

    fn is_visited(&self, position: Position) -> bool {
        self.cell(position).visited
    }

    fn random_weight(&mut self) -> u8 {
        self.rng.random_range(0..=MAX_WEIGHT)
    }

    /// Marks the start visited and points it out through the entrance.
    fn enter(&mut self) -> Position {
        let start = self.start;
        let entrance = self.entrance;

        let cell = self.cell_mut(start);
        cell.visited = true;
        cell.parent_direction = Some(entrance);

        self.visited.push(start);
        self.unvisited -= 1;
        start
    }

    /// Claims the neighbor of `from` in `direction` if it is still unvisited.
    /// Marking, parenting and linking happen together so no cell can be
    /// discovered twice.
    fn claim_neighbor(&mut self, from: Position, direction: Direction) -> Option<Position> {
        let neighbor = self.neighbor(from, direction)?;
        if self.is_visited(neighbor) {
            return None;
        }

        let weight = self.random_weight();
        self.cell_mut(from)
            .links
            .push(Link::Edge { direction, weight });

        let child = self.cell_mut(neighbor);
        child.visited = true;
        child.parent_direction = Some(direction.opposite());

        self.visited.push(neighbor);
        self.unvisited -= 1;
        Some(neighbor)
    }

    fn pick_out(&mut self, pool: Pool) -> Option<Position> {
        let cells = match pool {
            Pool::OnHold => &mut self.on_hold,
            Pool::Frontier => &mut self.frontier,
        };

        if cells.is_empty() {
            return None;
        }

        let i = self.rng.random_range(0..cells.len());
        Some(cells.swap_remove(i))
    }
}

#[derive(Clone, Copy, Debug)]
enum Pool {
    OnHold,
    Frontier,
}

fn point_on_side(side: Direction, length: usize, rng: &mut ChaCha8Rng) -> Position {
    let along = rng.random_range(0..length);
    let last = length - 1;

    match side {
        Direction::Up => Position::new(0, along),
        Direction::Down => Position::new(last, along),
        Direction::Left => Position::new(along, 0),
        Direction::Right => Position::new(along, last),
    }
}

/// Start and end on the border, at least half the side length apart. Each
/// comes with the outward direction of the side it was drawn from.
fn choose_start_end(
    length: usize,
    rng: &mut ChaCha8Rng,
) -> (Position, Direction, Position, Direction) {
    let sides: Vec<Direction> = Direction::iter().collect();
    let min_distance = (length / 2).max(1);

    let entrance = sides[rng.random_range(0..sides.len())];
    let start = point_on_side(entrance, length, rng);

    let other_sides: Vec<Direction> = sides.into_iter().filter(|&s| s != entrance).collect();

    for _ in 0..MAX_END_ATTEMPTS {
        let exit = other_sides[rng.random_range(0..other_sides.len())];
        let end = point_on_side(exit, length, rng);

        if end != start && start.squared_distance(&end) >= min_distance * min_distance {
            return (start, entrance, end, exit);
        }
    }

    // Opposite sides are `length - 1` apart, which always clears the minimum.
    let exit = entrance.opposite();
    let end = point_on_side(exit, length, rng);
    (start, entrance, end, exit)
}
