use std::{fs, path::PathBuf};

use common::{Direction, GridGraph, Link, Maze, MazeConfig, Position, Tuning};

const SEED: u64 = 7;

fn golden_config() -> MazeConfig {
    MazeConfig {
        length: 3,
        seed: SEED,
        path_length: 5,
        bud_count: 1,
        tuning: Tuning::default(),
    }
}

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("length3_seed7_path5_bud1.txt")
}

fn snapshot(maze: &Maze) -> String {
    format!(
        "start {}\nend {}\nentrance {}\nexit {}\n\nlinks\n{}\n\nparents\n{}\n\n{}\n",
        maze.start_coord(),
        maze.end_coord(),
        maze.entrance().code(),
        maze.exit().code(),
        maze.link_table(),
        maze.parent_table(),
        maze.log()
    )
}

const LINKS: &str = "F\t4\t4\nD\tD\t84\n68\t6\t8";
const PARENTS: &str = "6\t6\t2\n2\t6\t2\n2\t4\t4";

// Regenerate the fixture by hand after an intentional change to generation.
#[test]
fn three_by_three_maze_matches_the_pinned_fixture() {
    let maze = Maze::generate(&golden_config()).expect("generation should succeed");
    let path = fixture_path();
    let expected = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("missing fixture {}: {}", path.display(), e));

    assert_eq!(snapshot(&maze), expected, "maze drifted from {}", path.display());
}

#[test]
fn three_by_three_maze_has_the_pinned_layout() {
    let maze = Maze::generate(&golden_config()).expect("generation should succeed");

    assert_eq!(maze.start_coord(), Position::new(2, 0));
    assert_eq!(maze.end_coord(), Position::new(0, 0));
    assert_eq!(maze.entrance(), Direction::Down);
    assert_eq!(maze.exit(), Direction::Left);
    assert_eq!(maze.link_table(), LINKS);
    assert_eq!(maze.parent_table(), PARENTS);
}

#[test]
fn straight_bias_shapes_the_pinned_layout() {
    let config = MazeConfig {
        tuning: Tuning {
            straight_bias: 0.1,
            ..Tuning::default()
        },
        ..golden_config()
    };
    let maze = Maze::generate(&config).expect("generation should succeed");

    assert_ne!(maze.link_table(), LINKS);
}

#[test]
fn golden_scenario_is_a_spanning_tree() {
    let maze = Maze::generate(&golden_config()).expect("generation should succeed");

    let mut edges = 0;
    let mut finishes = 0;
    for row in maze.rows() {
        for cell in row {
            assert!(cell.is_visited());
            edges += cell.link_directions().count();
            finishes += cell.links().iter().filter(|l| **l == Link::Finish).count();
        }
    }

    assert_eq!(edges, 8);
    assert_eq!(finishes, 1);
    let end = maze.end_coord();
    assert_eq!(
        maze.cell_at(end.row, end.col).expect("end is inside").links(),
        [Link::Finish]
    );
}

#[test]
fn golden_scenario_is_reproducible_through_the_grid_api() {
    let config = golden_config();
    let mut grid = GridGraph::new_grid(config.length, config.seed).expect("valid length");
    grid.generate(config.path_length, config.bud_count)
        .expect("generation should succeed");

    assert!(grid.is_fully_visited());
    let maze = Maze::generate(&config).expect("generation should succeed");
    for row in 0..3 {
        for col in 0..3 {
            assert_eq!(grid.cell_at(row, col), maze.cell_at(row, col));
        }
    }
    assert_eq!(grid.into_maze().expect("generated"), maze);
}

#[test]
fn every_parent_is_one_of_the_four_codes() {
    let maze = Maze::generate(&golden_config()).expect("generation should succeed");
    for row in maze.rows() {
        for cell in row {
            let parent = cell.parent_direction().expect("every cell has a parent side");
            assert_eq!(Direction::from_code(parent.code()), Some(parent));
        }
    }
}
