pub mod cell;
pub mod maker;
pub mod pattern;

use std::fmt;

use bincode::{
    config::standard,
    serde::{decode_from_slice, encode_to_vec},
};
use serde::{Deserialize, Serialize};

use crate::config::MazeConfig;
use cell::{Cell, Direction, Link, Position};
pub use maker::{GenerationError, GridGraph, ParameterError, Tuning};
use maker::MIN_LENGTH;
use pattern::{WallPattern, wall_pattern};

/// A finished maze: every cell visited, linked into a tree rooted at the
/// start. Read-only from here on.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Maze {
    pub(crate) length: usize,
    pub(crate) seed: u64,
    pub(crate) cells: Vec<Cell>,
    pub(crate) start: Position,
    pub(crate) end: Position,
    pub(crate) entrance: Direction,
    pub(crate) exit: Direction,
}

impl Maze {
    pub fn generate(config: &MazeConfig) -> Result<Self, GenerationError> {
        let mut grid = GridGraph::new_grid(config.length, config.seed)?.with_tuning(config.tuning);
        grid.generate(config.path_length, config.bud_count)?;
        grid.into_maze()
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cell_index(Position::new(row, col))
            .and_then(|i| self.cells.get(i))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.length)
    }

    pub fn start_coord(&self) -> Position {
        self.start
    }

    pub fn end_coord(&self) -> Position {
        self.end
    }

    pub fn entrance(&self) -> Direction {
        self.entrance
    }

    pub fn exit(&self) -> Direction {
        self.exit
    }

    pub fn is_fully_visited(&self) -> bool {
        self.cells.iter().all(Cell::is_visited)
    }

    pub fn pattern_at(&self, row: usize, col: usize) -> Option<WallPattern> {
        self.cell_at(row, col).map(wall_pattern)
    }

    /// A `(2 * length + 1)` square of 1 for wall and 0 for space. Cells sit at
    /// odd coordinates, the walls and pillars between them at even ones.
    pub fn wall_grid(&self) -> Vec<Vec<u8>> {
        let size = 2 * self.length + 1;
        let mut grid = vec![vec![1; size]; size];

        for cell in &self.cells {
            let Position { row, col } = cell.position();
            let (z, x) = (2 * row + 1, 2 * col + 1);
            grid[z][x] = 0;

            for direction in cell.link_directions() {
                let (wz, wx) = wall_toward(z, x, direction);
                grid[wz][wx] = 0;
            }
        }

        for (position, side) in [(self.start, self.entrance), (self.end, self.exit)] {
            let (wz, wx) = wall_toward(2 * position.row + 1, 2 * position.col + 1, side);
            grid[wz][wx] = 0;
        }

        grid
    }

    pub fn log(&self) -> String {
        let start = (2 * self.start.row + 1, 2 * self.start.col + 1);
        let end = (2 * self.end.row + 1, 2 * self.end.col + 1);

        self.wall_grid()
            .iter()
            .enumerate()
            .map(|(z, row)| {
                row.iter()
                    .enumerate()
                    .map(|(x, &space)| {
                        if (z, x) == start {
                            "S "
                        } else if (z, x) == end {
                            "E "
                        } else if space == 0 {
                            "  "
                        } else {
                            "██"
                        }
                    })
                    .collect::<String>()
            })
            .collect::<Vec<String>>()
            .join("\n")
    }

    /// One token per cell: the direction codes of its children, `F` for the
    /// finish and `D` for a dead end.
    pub fn link_table(&self) -> String {
        self.rows()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.links().iter().map(Link::to_string).collect::<String>())
                    .collect::<Vec<String>>()
                    .join("\t")
            })
            .collect::<Vec<String>>()
            .join("\n")
    }

    /// The parent direction code of every cell.
    pub fn parent_table(&self) -> String {
        self.rows()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell.parent_direction() {
                        Some(direction) => direction.code().to_string(),
                        None => "-".to_string(),
                    })
                    .collect::<Vec<String>>()
                    .join("\t")
            })
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn encode(&self) -> Result<Vec<u8>, MazeCodecError> {
        encode_to_vec(self, standard()).map_err(MazeCodecError::Encode)
    }

    /// Decodes bytes produced by `encode`, rejecting mazes whose shape does
    /// not hold together.
    pub fn decode(bytes: &[u8]) -> Result<Self, MazeCodecError> {
        let (maze, _) =
            decode_from_slice::<Maze, _>(bytes, standard()).map_err(MazeCodecError::Decode)?;
        maze.check_shape()?;
        Ok(maze)
    }

    fn check_shape(&self) -> Result<(), MazeCodecError> {
        if self.length < MIN_LENGTH {
            return Err(MazeCodecError::Malformed("length below the minimum"));
        }
        if self.length.checked_mul(self.length) != Some(self.cells.len()) {
            return Err(MazeCodecError::Malformed("cell count does not match the length"));
        }
        if self.cell_index(self.start).is_none() || self.cell_index(self.end).is_none() {
            return Err(MazeCodecError::Malformed("start or end outside the grid"));
        }
        let misplaced = self
            .cells
            .iter()
            .enumerate()
            .any(|(i, cell)| self.cell_index(cell.position()) != Some(i));
        if misplaced {
            return Err(MazeCodecError::Malformed("cells out of row-major order"));
        }
        Ok(())
    }

    fn cell_index(&self, position: Position) -> Option<usize> {
        (position.row < self.length && position.col < self.length)
            .then(|| position.row * self.length + position.col)
    }
}

fn wall_toward(z: usize, x: usize, direction: Direction) -> (usize, usize) {
    match direction {
        Direction::Down => (z + 1, x),
        Direction::Left => (z, x - 1),
        Direction::Right => (z, x + 1),
        Direction::Up => (z - 1, x),
    }
}

#[derive(Debug)]
pub enum MazeCodecError {
    Encode(bincode::error::EncodeError),
    Decode(bincode::error::DecodeError),
    Malformed(&'static str),
}

impl fmt::Display for MazeCodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MazeCodecError::Encode(error) => write!(f, "failed to encode maze: {}", error),
            MazeCodecError::Decode(error) => write!(f, "failed to decode maze: {}", error),
            MazeCodecError::Malformed(reason) => write!(f, "malformed maze: {}", reason),
        }
    }
}

impl std::error::Error for MazeCodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MazeCodecError::Encode(error) => Some(error),
            MazeCodecError::Decode(error) => Some(error),
            MazeCodecError::Malformed(_) => None,
        }
    }
}

impl fmt::Debug for Maze {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.log())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    fn config(length: usize, seed: u64, path_length: usize, bud_count: usize) -> MazeConfig {
        MazeConfig {
            length,
            seed,
            path_length,
            bud_count,
            tuning: Tuning::default(),
        }
    }

    #[test]
    fn test_links_reach_every_cell() {
        for seed in 0..64 {
            let maze = Maze::generate(&config(9, seed, 6, 1)).expect("generation should succeed");
            assert_links_reach_every_cell(&maze);
        }
    }

    #[test]
    fn test_smallest_maze_links_reach_every_cell() {
        for seed in 0..64 {
            let maze = Maze::generate(&config(2, seed, 3, 0)).expect("generation should succeed");
            assert!(maze.is_fully_visited());
            assert_links_reach_every_cell(&maze);
        }
    }

    #[test]
    fn test_same_seed_gives_identical_bytes() {
        for seed in [0, 1, 7, 1234, u64::MAX] {
            let first = Maze::generate(&config(12, seed, 8, 2)).expect("generation should succeed");
            let second = Maze::generate(&config(12, seed, 8, 2)).expect("generation should succeed");

            assert_eq!(
                first.encode().expect("encodes"),
                second.encode().expect("encodes")
            );
        }
    }

    #[test]
    fn test_different_seeds_give_different_mazes() {
        let first = Maze::generate(&config(12, 1, 8, 2)).expect("generation should succeed");
        let second = Maze::generate(&config(12, 2, 8, 2)).expect("generation should succeed");
        assert_ne!(first, second);
    }

    #[test]
    fn test_path_length_beyond_cell_count_is_unbounded() {
        for seed in 0..16 {
            let cells = 8 * 8;
            let bounded = Maze::generate(&config(8, seed, cells + 1, 1)).expect("succeeds");
            let unbounded = Maze::generate(&config(8, seed, usize::MAX, 1)).expect("succeeds");
            assert_eq!(bounded, unbounded);
        }
    }

    #[test]
    fn test_encoded_maze_decodes_to_the_same_maze() {
        let maze = Maze::generate(&config(6, 42, 5, 1)).expect("generation should succeed");
        let bytes = maze.encode().expect("encodes");
        assert_eq!(Maze::decode(&bytes).expect("decodes"), maze);
    }

    #[test]
    fn test_decode_rejects_truncated_bytes() {
        let maze = Maze::generate(&config(6, 42, 5, 1)).expect("generation should succeed");
        let bytes = maze.encode().expect("encodes");
        assert!(matches!(
            Maze::decode(&bytes[..bytes.len() / 2]),
            Err(MazeCodecError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_rejects_a_length_that_disagrees_with_the_cells() {
        let maze = Maze::generate(&config(3, 7, 5, 1)).expect("generation should succeed");
        let mut bytes = maze.encode().expect("encodes");

        // The length is the first field, a one-byte varint for small values.
        assert_eq!(bytes[0], 3);
        bytes[0] = 9;

        assert!(matches!(
            Maze::decode(&bytes),
            Err(MazeCodecError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_rejects_inconsistent_shapes() {
        let maze = Maze::generate(&config(4, 1, 5, 1)).expect("generation should succeed");

        let empty = Maze {
            length: 0,
            cells: Vec::new(),
            ..maze.clone()
        };
        let outside = Maze {
            end: Position::new(4, 0),
            ..maze.clone()
        };
        let mut shuffled = maze.clone();
        shuffled.cells.swap(0, 1);

        for broken in [empty, outside, shuffled] {
            let bytes = broken.encode().expect("encodes");
            assert!(matches!(
                Maze::decode(&bytes),
                Err(MazeCodecError::Malformed(_))
            ));
        }
        assert_eq!(Maze::decode(&maze.encode().expect("encodes")).expect("decodes"), maze);
    }

    #[test]
    fn test_generate_surfaces_invalid_size() {
        assert_eq!(
            Maze::generate(&config(1, 0, 5, 1)),
            Err(GenerationError::InvalidSize { length: 1 })
        );
    }

    #[test]
    fn test_link_table_has_one_token_per_cell() {
        let maze = Maze::generate(&config(4, 3, 5, 1)).expect("generation should succeed");
        let table = maze.link_table();
        let rows: Vec<&str> = table.lines().collect();

        assert_eq!(rows.len(), 4);
        for row in rows {
            let tokens: Vec<&str> = row.split('\t').collect();
            assert_eq!(tokens.len(), 4);
            assert!(tokens.iter().all(|token| !token.is_empty()));
        }
        assert_eq!(table.matches('F').count(), 1);
    }

    fn assert_links_reach_every_cell(maze: &Maze) {
        let length = maze.length();
        let grid = maze.wall_grid();
        let open = grid.iter().flatten().filter(|&&wall| wall == 0).count();

        // Cells, one passage per tree edge, entrance and exit.
        let cells = length * length;
        assert_eq!(open, cells + (cells - 1) + 2, "\n{}", maze.log());

        let mut reached = vec![false; cells];
        let mut queue = VecDeque::from([maze.start_coord()]);
        reached[maze.start_coord().row * length + maze.start_coord().col] = true;

        while let Some(position) = queue.pop_front() {
            let cell = maze.cell_at(position.row, position.col).expect("inside the grid");
            let (z, x) = (2 * position.row + 1, 2 * position.col + 1);

            for direction in cell.link_directions() {
                let (wz, wx) = wall_toward(z, x, direction);
                assert_eq!(grid[wz][wx], 0, "link {} from {} is walled", direction, position);

                let child = cell::neighbor_in_direction(position, direction, length)
                    .expect("links stay inside the grid");
                let index = child.row * length + child.col;
                assert!(!reached[index], "{} reached twice", child);
                reached[index] = true;
                queue.push_back(child);
            }
        }

        assert!(
            reached.iter().all(|&r| r),
            "every cell should hang off the start:\n{}",
            maze.log()
        );
    }
}
