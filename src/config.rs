//! Run configuration, read from the environment.
use std::env;
use std::path::PathBuf;

use crate::entities::{MAX_STRENGTH, STARTING_HP, STRENGTH_INCREASE, VICTORY_POINTS};

/// Rules and wiring for one run.
///
/// Environment variables (all optional, invalid values fall back to defaults):
/// - `NUMTYPE_STARTING_HP` - hearts at the start (default: 10, min 1)
/// - `NUMTYPE_VICTORY_POINTS` - score that wins the game (default: 10000)
/// - `NUMTYPE_STARTING_TARGETS` - timed targets on the board at the start (default: 4)
/// - `NUMTYPE_STARTING_STRENGTH` - strength of those targets (default: 2.7, 0 to 9)
/// - `NUMTYPE_BOARD_WIDTH` - target width in columns (default: 30, min 8)
/// - `NUMTYPE_SEED` - fixes the random sequence
/// - `NUMTYPE_LOG_FILE` - write logs to this file
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub starting_hp: u32,
    pub victory_points: i64,
    pub starting_targets: usize,
    pub starting_strength: f64,
    pub board_width: u16,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_hp: STARTING_HP,
            victory_points: VICTORY_POINTS,
            starting_targets: 4,
            starting_strength: 3.0 - STRENGTH_INCREASE,
            board_width: 30,
            seed: None,
            log_file: None,
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(hp) = read_env::<u32>("NUMTYPE_STARTING_HP") {
            config.starting_hp = hp.max(1);
        }
        if let Some(points) = read_env::<i64>("NUMTYPE_VICTORY_POINTS") {
            config.victory_points = points;
        }
        if let Some(count) = read_env::<usize>("NUMTYPE_STARTING_TARGETS") {
            config.starting_targets = count;
        }
        if let Some(strength) = read_env::<f64>("NUMTYPE_STARTING_STRENGTH") {
            if strength.is_finite() {
                config.starting_strength = strength.clamp(0.0, MAX_STRENGTH);
            }
        }
        if let Some(width) = read_env::<u16>("NUMTYPE_BOARD_WIDTH") {
            config.board_width = width.max(8);
        }
        config.seed = read_env::<u64>("NUMTYPE_SEED");
        config.log_file = env::var_os("NUMTYPE_LOG_FILE").map(PathBuf::from);

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}
