// Core arena types shared by the engine, the serializer and the move sources

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MoveError;

/// Move code meaning "no move yet" (a player's previous move before the first tick)
pub const NO_MOVE: i32 = 0;

/// Move code a source reports when it could not produce a usable move
pub const SENTINEL_MOVE: i32 = -1;

/// A board cell as (row, col), 0-indexed from the top-left corner
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub fn new(row: i32, col: i32) -> Self {
        Coord { row, col }
    }
}

/// The four movement directions, numbered as they travel over the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left = 1,
    Up = 2,
    Right = 3,
    Down = 4,
}

impl Direction {
    /// Returns all possible directions in wire order
    pub fn all() -> [Direction; 4] {
        [Direction::Left, Direction::Up, Direction::Right, Direction::Down]
    }

    /// Decodes a wire move code
    pub fn from_code(code: i32) -> Result<Direction, MoveError> {
        match code {
            1 => Ok(Direction::Left),
            2 => Ok(Direction::Up),
            3 => Ok(Direction::Right),
            4 => Ok(Direction::Down),
            other => Err(MoveError::InvalidMove(other)),
        }
    }

    pub fn code(&self) -> i32 {
        *self as i32
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
        }
    }

    /// Calculates the neighbouring cell in this direction.
    /// Rows grow downwards, so "up" decrements the row.
    pub fn apply(&self, coord: &Coord) -> Coord {
        match self {
            Direction::Left => Coord { row: coord.row, col: coord.col - 1 },
            Direction::Up => Coord { row: coord.row - 1, col: coord.col },
            Direction::Right => Coord { row: coord.row, col: coord.col + 1 },
            Direction::Down => Coord { row: coord.row + 1, col: coord.col },
        }
    }
}

/// Contents of a single board cell; the discriminant is the code shown in board dumps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty = 0,
    PlayerOne = 1,
    PlayerTwo = 2,
    Wall = 3,
}

impl Cell {
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

/// Identifies one of the two fixed player slots
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub fn number(&self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    pub fn from_number(number: u8) -> Option<PlayerId> {
        match number {
            1 => Some(PlayerId::One),
            2 => Some(PlayerId::Two),
            _ => None,
        }
    }

    pub fn opponent(&self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    pub fn cell(&self) -> Cell {
        match self {
            PlayerId::One => Cell::PlayerOne,
            PlayerId::Two => Cell::PlayerTwo,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.number())
    }
}

/// Terminal result of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Heads met on the same cell or swapped cells; draw
    PlayersCollided,
    /// Both heads struck a wall in the same tick; draw
    BothWalls,
    /// One player was eliminated and the other wins
    Eliminated { winner: PlayerId },
}

impl Outcome {
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            Outcome::Eliminated { winner } => Some(*winner),
            Outcome::PlayersCollided | Outcome::BothWalls => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::PlayersCollided => write!(f, "draw: players collided"),
            Outcome::BothWalls => write!(f, "draw: both players hit a wall"),
            Outcome::Eliminated { winner } => write!(f, "{} wins", winner),
        }
    }
}
