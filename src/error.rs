// Error types for the arena
//
// ArenaError is fatal and stops a match before it starts (or aborts it on interrupt).
// MoveError is a plain value: the engine and the collector substitute a fallback move.

use thiserror::Error;

use crate::types::PlayerId;

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Board size {size} is too small (minimum {min})")]
    BoardTooSmall { size: i32, min: i32 },
    #[error("Invalid player number: {0}")]
    InvalidPlayerNumber(u8),
    #[error("Failed to initialize move source for {player}: {source_name}")]
    SourceInitialization { player: PlayerId, source_name: String },
    #[error("Match interrupted")]
    Interrupted,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("Invalid move code {0}")]
    InvalidMove(i32),
    #[error("Move code {0} reverses the previous direction")]
    Suicidal(i32),
}
