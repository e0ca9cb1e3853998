// Configuration module for reading Arena.toml
// Board geometry, pacing and the move source for each seat

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::board::MIN_BOARD_SIZE;
use crate::error::ArenaError;
use crate::strategy;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub board: BoardConfig,
    pub timing: TimingConfig,
    pub player_one: SeatConfig,
    pub player_two: SeatConfig,
}

/// Board geometry
#[derive(Debug, Deserialize, Clone)]
pub struct BoardConfig {
    /// Side length including the wall border
    pub size: i32,
    /// Segments kept behind the head
    pub trail_length: usize,
}

/// Pacing and bounded waits, all in milliseconds
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    /// Pause between ticks; 0 runs the match flat out
    pub tick_delay_ms: u64,
    /// Longest wait for an agent's reply; 0 waits forever
    pub move_timeout_ms: u64,
    /// Longest wait for an agent to drain and exit during cleanup
    pub cleanup_timeout_ms: u64,
}

/// Which kind of move source drives a seat
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeatKind {
    Human,
    Agent,
    Local,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeatConfig {
    pub kind: SeatKind,
    /// Program and arguments of the external agent (kind = "agent")
    #[serde(default)]
    pub command: Vec<String>,
    /// Strategy name for in-process agents (kind = "local")
    #[serde(default = "default_strategy")]
    pub strategy: String,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_strategy() -> String {
    "random".to_string()
}

impl SeatConfig {
    fn validate(&self, seat: &str) -> Result<(), ArenaError> {
        match self.kind {
            SeatKind::Agent if self.command.is_empty() => Err(ArenaError::Config(format!(
                "{}: agent seat needs a command",
                seat
            ))),
            SeatKind::Local if strategy::by_name(&self.strategy, None).is_none() => {
                Err(ArenaError::Config(format!(
                    "{}: unknown strategy '{}'",
                    seat, self.strategy
                )))
            }
            _ => Ok(()),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Arena.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, ArenaError>` - Parsed and validated configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ArenaError> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| ArenaError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ArenaError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Loads default configuration from Arena.toml in the project root
    pub fn load_default() -> Result<Self, ArenaError> {
        Self::from_file("Arena.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the values in Arena.toml
    pub fn default_hardcoded() -> Self {
        let agent = SeatConfig {
            kind: SeatKind::Agent,
            command: [
                "docker",
                "run",
                "-i",
                "--rm",
                "--network",
                "none",
                "--memory",
                "512m",
                "--cpus",
                "1",
                "jokkess/hackatron-random-bot",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            strategy: default_strategy(),
            seed: None,
        };

        Config {
            board: BoardConfig {
                size: 16,
                trail_length: 10,
            },
            timing: TimingConfig {
                tick_delay_ms: 100,
                move_timeout_ms: 0,
                cleanup_timeout_ms: 2000,
            },
            player_one: agent.clone(),
            player_two: agent,
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Arena.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }

    /// Rejects settings the engine cannot run with
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.board.size < MIN_BOARD_SIZE {
            return Err(ArenaError::BoardTooSmall {
                size: self.board.size,
                min: MIN_BOARD_SIZE,
            });
        }
        if self.board.trail_length == 0 {
            return Err(ArenaError::Config(
                "board.trail_length must be at least 1".to_string(),
            ));
        }
        self.player_one.validate("player_one")?;
        self.player_two.validate("player_two")
    }
}
