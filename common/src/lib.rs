pub mod config;
pub mod constants;
pub mod maze;

pub use config::{ConfigError, MazeConfig};
pub use maze::{
    GenerationError, GridGraph, Maze, MazeCodecError, ParameterError, Tuning,
    cell::{Cell, Direction, Link, Position, Role, neighbor_in_direction},
    pattern::{WallPattern, wall_pattern},
};
