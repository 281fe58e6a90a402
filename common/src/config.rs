use std::{env, fmt, str::FromStr};

use dotenvy;
use rand::Rng;

use crate::constants::{
    DEFAULT_BUD_COUNT, DEFAULT_LENGTH, DEFAULT_PATH_LENGTH, DEFAULT_STRAIGHT_BIAS,
    DEFAULT_WALL_HUG_BIAS,
};
use crate::maze::Tuning;

pub const LENGTH_KEY: &str = "MAZE_LENGTH";
pub const SEED_KEY: &str = "MAZE_SEED";
pub const PATH_LENGTH_KEY: &str = "MAZE_PATH_LENGTH";
pub const BUD_COUNT_KEY: &str = "MAZE_BUD_COUNT";
pub const STRAIGHT_BIAS_KEY: &str = "MAZE_STRAIGHT_BIAS";
pub const WALL_HUG_BIAS_KEY: &str = "MAZE_WALL_HUG_BIAS";

#[derive(Clone, Debug, PartialEq)]
pub struct MazeConfig {
    pub length: usize,
    pub seed: u64,
    pub path_length: usize,
    pub bud_count: usize,
    pub tuning: Tuning,
}

impl Default for MazeConfig {
    fn default() -> Self {
        MazeConfig {
            length: DEFAULT_LENGTH,
            seed: rand::rng().random(),
            path_length: DEFAULT_PATH_LENGTH,
            bud_count: DEFAULT_BUD_COUNT,
            tuning: Tuning::default(),
        }
    }
}

impl MazeConfig {
    /// Reads settings from the environment, after loading `.env` if there is
    /// one. Missing settings fall back to the defaults; without a seed, a
    /// fresh one is drawn.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let seed = match lookup(SEED_KEY) {
            Some(value) => parse(SEED_KEY, value)?,
            None => rand::rng().random(),
        };

        Ok(MazeConfig {
            length: parse_or(&lookup, LENGTH_KEY, DEFAULT_LENGTH)?,
            seed,
            path_length: parse_or(&lookup, PATH_LENGTH_KEY, DEFAULT_PATH_LENGTH)?,
            bud_count: parse_or(&lookup, BUD_COUNT_KEY, DEFAULT_BUD_COUNT)?,
            tuning: Tuning {
                straight_bias: parse_or(&lookup, STRAIGHT_BIAS_KEY, DEFAULT_STRAIGHT_BIAS)?,
                wall_hug_bias: parse_or(&lookup, WALL_HUG_BIAS_KEY, DEFAULT_WALL_HUG_BIAS)?,
            },
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => parse(key, value),
        None => Ok(default),
    }
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value: '{}'", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
