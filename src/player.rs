// Player entity: a head plus a bounded trail
//
// The position sequence has a fixed length for the player's whole life. Index 0 is the
// head; the remaining slots hold older cells and stay None until enough ticks have passed
// to fill them. Every move pushes a new head and drops the oldest slot.

use log::{error, warn};
use rand::Rng;
use std::collections::VecDeque;

use crate::board::MIN_BOARD_SIZE;
use crate::error::{ArenaError, MoveError};
use crate::types::{Coord, Direction, PlayerId, NO_MOVE};

#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    position: VecDeque<Option<Coord>>,
    previous_move: Option<Direction>,
}

impl Player {
    /// Spawns a player at a random cell of its half of the board.
    ///
    /// Player 1 lands strictly above the main diagonal (upper-right triangle) and
    /// player 2 strictly below it (lower-left), so the two never start adjacent on
    /// the diagonal itself.
    ///
    /// # Arguments
    /// * `number` - Player number, 1 or 2
    /// * `size` - Board size including the wall border
    /// * `trail_length` - Number of trailing segments behind the head
    /// * `rng` - Randomness source for the spawn cell
    pub fn spawn<R: Rng + ?Sized>(
        number: u8,
        size: i32,
        trail_length: usize,
        rng: &mut R,
    ) -> Result<Self, ArenaError> {
        let id = PlayerId::from_number(number).ok_or(ArenaError::InvalidPlayerNumber(number))?;
        if size < MIN_BOARD_SIZE {
            return Err(ArenaError::BoardTooSmall {
                size,
                min: MIN_BOARD_SIZE,
            });
        }

        let head = match id {
            PlayerId::One => {
                let col = rng.random_range(2..=size - 2);
                let row = rng.random_range(1..=col - 1);
                Coord::new(row, col)
            }
            PlayerId::Two => {
                let row = rng.random_range(2..=size - 2);
                let col = rng.random_range(1..=row - 1);
                Coord::new(row, col)
            }
        };

        Ok(Self::at(id, head, trail_length))
    }

    /// Places a player with a known head cell and an empty trail
    pub fn at(id: PlayerId, head: Coord, trail_length: usize) -> Self {
        let mut position = VecDeque::with_capacity(trail_length + 1);
        position.push_back(Some(head));
        position.extend(std::iter::repeat(None).take(trail_length));

        Player {
            id,
            position,
            previous_move: None,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn number(&self) -> u8 {
        self.id.number()
    }

    pub fn head(&self) -> Option<Coord> {
        self.position.front().copied().flatten()
    }

    /// Full fixed-length position sequence, head first
    pub fn position(&self) -> &VecDeque<Option<Coord>> {
        &self.position
    }

    /// Occupied cells only, head first
    pub fn trail(&self) -> impl Iterator<Item = Coord> + '_ {
        self.position.iter().filter_map(|c| *c)
    }

    pub fn occupies(&self, coord: &Coord) -> bool {
        self.position.iter().any(|c| c.as_ref() == Some(coord))
    }

    /// The slot that the next move evicts
    pub fn oldest(&self) -> Option<Coord> {
        self.position.back().copied().flatten()
    }

    /// Previous move as a wire code, 0 when the player has not moved yet
    pub fn previous_move(&self) -> i32 {
        self.previous_move.map_or(NO_MOVE, |d| d.code())
    }

    pub fn is_valid_move(code: i32) -> bool {
        (1..=4).contains(&code)
    }

    /// True when `code` is the exact reversal of the previous move
    pub fn player_suicided(&self, code: i32) -> bool {
        match self.previous_move {
            Some(prev) => code == prev.opposite().code(),
            None => false,
        }
    }

    /// Classifies a requested move without applying it
    pub fn resolve_move(&self, code: i32) -> Result<Direction, MoveError> {
        let dir = Direction::from_code(code)?;
        if self.player_suicided(code) {
            return Err(MoveError::Suicidal(code));
        }
        Ok(dir)
    }

    /// Direction used when a requested move is rejected: keep going straight,
    /// or up on the very first tick
    pub fn fallback_direction(&self) -> Direction {
        self.previous_move.unwrap_or(Direction::Up)
    }

    /// Advances the head one cell.
    ///
    /// Invalid or suicidal requests are replaced by the fallback direction. The
    /// direction actually applied becomes the new previous move, so repeated bad
    /// input keeps the player moving straight.
    ///
    /// # Returns
    /// * `Direction` - The direction that was applied
    pub fn move_to(&mut self, code: i32) -> Direction {
        let dir = match self.resolve_move(code) {
            Ok(dir) => dir,
            Err(e) => {
                let fallback = self.fallback_direction();
                warn!(
                    "{}: {}; moving {} instead",
                    self.id,
                    e,
                    fallback.as_str()
                );
                fallback
            }
        };

        let Some(head) = self.head() else {
            error!("{} has no head to move from", self.id);
            return dir;
        };

        self.position.push_front(Some(dir.apply(&head)));
        self.position.pop_back();
        self.previous_move = Some(dir);
        dir
    }
}
