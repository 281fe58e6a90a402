use std::{
    env, fs,
    io::{self, Write, stdout},
    path::{Path, PathBuf},
    process,
};

use crossterm::{
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use log::info;

use common::{Maze, MazeConfig};

const EXPORT_KEY: &str = "MAZE_EXPORT";

fn main() {
    env_logger::init();

    let config = match MazeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to read maze settings.");
            eprintln!("Details: {}.", e);
            process::exit(1);
        }
    };

    info!("maze settings: {:?}", config);

    let maze = match Maze::generate(&config) {
        Ok(maze) => maze,
        Err(e) => {
            eprintln!("Error: Failed to generate maze.");
            eprintln!("Details: {}.", e);
            process::exit(1);
        }
    };

    if let Err(e) = print_maze(&maze) {
        eprintln!("Error: Failed to print maze.");
        eprintln!("Details: {}.", e);
        process::exit(1);
    }

    if let Some(path) = env::var_os(EXPORT_KEY).map(PathBuf::from) {
        if let Err(e) = export(&maze, &path) {
            eprintln!("Error: Failed to export maze to {}.", path.display());
            eprintln!("Details: {}.", e);
            process::exit(1);
        }
        println!("Maze written to {}.", path.display());
    }
}

fn print_maze(maze: &Maze) -> io::Result<()> {
    let mut out = stdout();

    println!("seed: {}", maze.seed());
    println!("start: {} (entrance {})", maze.start_coord(), maze.entrance());
    println!("end: {} (exit {})", maze.end_coord(), maze.exit());
    println!();
    println!("=============== links ===============");
    println!("{}", maze.link_table());
    println!();

    for line in maze.log().lines() {
        for chunk in line.chars().collect::<Vec<_>>().chunks(2) {
            let token: String = chunk.iter().collect();
            let color = match token.as_str() {
                "S " => Some(Color::Green),
                "E " => Some(Color::Red),
                _ => None,
            };

            match color {
                Some(color) => queue!(out, SetForegroundColor(color), Print(&token), ResetColor)?,
                None => queue!(out, Print(&token))?,
            }
        }
        queue!(out, Print("\n"))?;
    }

    execute!(out, ResetColor)?;
    out.flush()
}

fn export(maze: &Maze, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = maze.encode()?;
    info!("exporting {} bytes", bytes.len());
    fs::write(path, bytes)?;
    Ok(())
}
