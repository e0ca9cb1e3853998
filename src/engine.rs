// Simulation engine
//
// GameState owns the board and both players. A tick applies both moves at once,
// resolves collisions against the new heads in a fixed precedence and repaints the
// board. Once an outcome is recorded the state is never mutated again.

use log::{debug, info, warn};
use rand::Rng;
use std::fmt;

use crate::board::Board;
use crate::error::ArenaError;
use crate::player::Player;
use crate::types::{Cell, Coord, Outcome, PlayerId};

#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    player_one: Player,
    player_two: Player,
    outcome: Option<Outcome>,
    ticks: u64,
}

impl GameState {
    /// Creates a match on a `size` x `size` board with randomly spawned players
    pub fn new(size: i32, trail_length: usize) -> Result<Self, ArenaError> {
        Self::with_rng(size, trail_length, &mut rand::rng())
    }

    /// Like `new`, drawing spawn cells from the given generator
    pub fn with_rng<R: Rng + ?Sized>(
        size: i32,
        trail_length: usize,
        rng: &mut R,
    ) -> Result<Self, ArenaError> {
        let board = Board::new(size)?;
        let player_one = Player::spawn(1, size, trail_length, rng)?;
        let player_two = Player::spawn(2, size, trail_length, rng)?;
        Ok(Self::from_parts(board, player_one, player_two))
    }

    /// Assembles a state from pre-built players; used for fixed scenarios
    pub fn with_players(
        size: i32,
        player_one: Player,
        player_two: Player,
    ) -> Result<Self, ArenaError> {
        if player_one.id() != PlayerId::One {
            return Err(ArenaError::InvalidPlayerNumber(player_one.number()));
        }
        if player_two.id() != PlayerId::Two {
            return Err(ArenaError::InvalidPlayerNumber(player_two.number()));
        }
        let board = Board::new(size)?;
        Ok(Self::from_parts(board, player_one, player_two))
    }

    fn from_parts(board: Board, player_one: Player, player_two: Player) -> Self {
        let mut state = GameState {
            board,
            player_one,
            player_two,
            outcome: None,
            ticks: 0,
        };
        state.repaint();
        state
    }

    pub fn size(&self) -> i32 {
        self.board.size()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        match id {
            PlayerId::One => &self.player_one,
            PlayerId::Two => &self.player_two,
        }
    }

    pub fn player_one(&self) -> &Player {
        &self.player_one
    }

    pub fn player_two(&self) -> &Player {
        &self.player_two
    }

    pub fn game_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.outcome.and_then(|o| o.winner())
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Applies both players' moves simultaneously.
    ///
    /// # Arguments
    /// * `move_one` - Move code for player 1; invalid codes fall back inside the player
    /// * `move_two` - Move code for player 2
    ///
    /// # Returns
    /// * `Option<Outcome>` - The outcome if this tick ended the match, None otherwise
    pub fn tick(&mut self, move_one: i32, move_two: i32) -> Option<Outcome> {
        if self.game_over() {
            warn!("Tick requested after the match ended; ignoring");
            return None;
        }

        let evicted_one = self.player_one.oldest();
        let evicted_two = self.player_two.oldest();
        let old_head_one = self.player_one.head();
        let old_head_two = self.player_two.head();

        let dir_one = self.player_one.move_to(move_one);
        let dir_two = self.player_two.move_to(move_two);
        self.ticks += 1;

        debug!(
            "Tick {}: player 1 {} -> {:?}, player 2 {} -> {:?}",
            self.ticks,
            dir_one.as_str(),
            self.player_one.head(),
            dir_two.as_str(),
            self.player_two.head()
        );

        let outcome = match (self.player_one.head(), self.player_two.head()) {
            (Some(new_one), Some(new_two)) => {
                self.detect_collision(new_one, new_two, old_head_one, old_head_two)
            }
            _ => None,
        };

        if let Some(outcome) = outcome {
            info!("Tick {}: {}", self.ticks, outcome);
            self.outcome = Some(outcome);
        }

        for cell in [evicted_one, evicted_two].into_iter().flatten() {
            self.board.paint(&cell, Cell::Empty);
        }
        self.repaint();

        outcome
    }

    /// Collision rules, first match wins:
    /// head-on or head swap, both in walls, player 1 out, player 2 out.
    ///
    /// When both players would be eliminated by the third and fourth rules in the
    /// same tick only player 1's elimination is reported.
    fn detect_collision(
        &self,
        new_one: Coord,
        new_two: Coord,
        old_one: Option<Coord>,
        old_two: Option<Coord>,
    ) -> Option<Outcome> {
        let swapped = old_one == Some(new_two) && old_two == Some(new_one);
        if new_one == new_two || swapped {
            return Some(Outcome::PlayersCollided);
        }

        let one_in_wall = self.board.is_wall(&new_one);
        let two_in_wall = self.board.is_wall(&new_two);

        if one_in_wall && two_in_wall {
            return Some(Outcome::BothWalls);
        }

        if one_in_wall || self.player_two.occupies(&new_one) {
            return Some(Outcome::Eliminated {
                winner: PlayerId::Two,
            });
        }

        if two_in_wall || self.player_one.occupies(&new_two) {
            return Some(Outcome::Eliminated {
                winner: PlayerId::One,
            });
        }

        None
    }

    fn repaint(&mut self) {
        for player in [&self.player_one, &self.player_two] {
            let cell = player.id().cell();
            for coord in player.trail() {
                self.board.paint(&coord, cell);
            }
        }
    }
}

impl fmt::Display for GameState {
    /// One line per row of space-separated cell codes
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.board.rows() {
            let line: Vec<String> = row.iter().map(|c| c.code().to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn state(size: i32, one: Coord, two: Coord) -> GameState {
        GameState::with_players(
            size,
            Player::at(PlayerId::One, one, 10),
            Player::at(PlayerId::Two, two, 10),
        )
        .unwrap()
    }

    #[test]
    fn test_initial_heads_are_painted() {
        let game = state(8, Coord::new(2, 5), Coord::new(5, 2));
        assert_eq!(game.board().cell(&Coord::new(2, 5)), Some(Cell::PlayerOne));
        assert_eq!(game.board().cell(&Coord::new(5, 2)), Some(Cell::PlayerTwo));
        assert!(!game.game_over());
    }

    #[test]
    fn test_with_players_rejects_swapped_slots() {
        let result = GameState::with_players(
            8,
            Player::at(PlayerId::Two, Coord::new(2, 5), 10),
            Player::at(PlayerId::Two, Coord::new(5, 2), 10),
        );
        assert!(matches!(result, Err(ArenaError::InvalidPlayerNumber(2))));
    }

    #[test]
    fn test_random_spawn_is_reproducible() {
        let a = GameState::with_rng(16, 10, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = GameState::with_rng(16, 10, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a.player_one().head(), b.player_one().head());
        assert_eq!(a.player_two().head(), b.player_two().head());
    }

    #[test]
    fn test_quiet_tick_continues() {
        let mut game = state(10, Coord::new(2, 6), Coord::new(6, 2));
        assert_eq!(game.tick(3, 1), None);
        assert!(!game.game_over());
        assert_eq!(game.winner(), None);
        assert_eq!(game.ticks(), 1);
        assert_eq!(game.player_one().head(), Some(Coord::new(2, 7)));
        assert_eq!(game.player_two().head(), Some(Coord::new(6, 1)));
    }

    #[test]
    fn test_heads_on_same_cell_is_draw() {
        // Both step into (4, 4)
        let mut game = state(10, Coord::new(4, 5), Coord::new(4, 3));
        assert_eq!(game.tick(1, 3), Some(Outcome::PlayersCollided));
        assert!(game.game_over());
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn test_head_swap_is_draw() {
        let mut game = state(10, Coord::new(4, 5), Coord::new(4, 4));
        assert_eq!(game.tick(1, 3), Some(Outcome::PlayersCollided));
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn test_player_one_into_wall_loses() {
        let mut game = state(10, Coord::new(1, 5), Coord::new(6, 2));
        assert_eq!(
            game.tick(2, 4),
            Some(Outcome::Eliminated {
                winner: PlayerId::Two
            })
        );
        assert_eq!(game.winner(), Some(PlayerId::Two));
    }

    #[test]
    fn test_both_into_walls_is_draw() {
        let mut game = state(10, Coord::new(1, 5), Coord::new(8, 2));
        assert_eq!(game.tick(2, 4), Some(Outcome::BothWalls));
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn test_player_two_into_player_one_trail_loses() {
        let mut game = state(12, Coord::new(5, 3), Coord::new(7, 5));
        // Player 1 lays a trail along row 5 heading right
        game.tick(3, 2); // p1 (5,4), p2 (6,5)
        game.tick(3, 1); // p1 (5,5), p2 (6,4)
        // p2 moves up into (5,4), which is player 1's trail
        assert_eq!(
            game.tick(3, 2),
            Some(Outcome::Eliminated {
                winner: PlayerId::One
            })
        );
    }

    /// Player 1 heads left along row 4 while player 2 heads right along row 5
    fn passing_lanes() -> GameState {
        let mut game = state(12, Coord::new(4, 8), Coord::new(5, 2));
        for _ in 0..4 {
            assert_eq!(game.tick(1, 3), None);
        }
        // p1 (4,4) with trail back to (4,8), p2 (5,6) with trail back to (5,2)
        game
    }

    #[test]
    fn test_player_one_into_player_two_trail_loses() {
        let mut game = passing_lanes();
        // p1 drops onto (5,4), two cells behind player 2's head; p2 carries on to (5,7)
        assert_eq!(
            game.tick(4, 3),
            Some(Outcome::Eliminated {
                winner: PlayerId::Two
            })
        );
        assert_eq!(game.player_two().head(), Some(Coord::new(5, 7)));
    }

    #[test]
    fn test_both_into_each_others_trail_reports_player_two_as_winner() {
        let mut game = passing_lanes();
        // p1 -> (5,4) in p2's trail, p2 -> (4,6) in p1's trail, no wall involved
        assert_eq!(
            game.tick(4, 2),
            Some(Outcome::Eliminated {
                winner: PlayerId::Two
            })
        );
    }

    #[test]
    fn test_double_elimination_reports_player_two_as_winner() {
        // Player 1 hits the top wall while player 2 runs into player 1's trail
        let mut game = state(10, Coord::new(2, 5), Coord::new(3, 3));
        game.tick(3, 2); // p1 (2,6), p2 (2,3)
        game.tick(2, 3); // p1 (1,6), p2 (2,4)
        // p2 (2,4) -> (2,5) which is in p1's trail, p1 (1,6) -> (0,6) wall
        assert_eq!(
            game.tick(2, 3),
            Some(Outcome::Eliminated {
                winner: PlayerId::Two
            })
        );
    }

    #[test]
    fn test_running_over_own_trail_is_not_fatal() {
        let mut game = state(12, Coord::new(5, 5), Coord::new(9, 2));
        game.tick(3, 3); // (5,6)
        game.tick(4, 3); // (6,6)
        game.tick(1, 3); // (6,5)
        // Up again lands on (5,5), the player's own trail
        assert_eq!(game.tick(2, 2), None);
        assert!(!game.game_over());
    }

    #[test]
    fn test_board_erases_evicted_cells() {
        let mut game = GameState::with_players(
            12,
            Player::at(PlayerId::One, Coord::new(5, 2), 2),
            Player::at(PlayerId::Two, Coord::new(9, 2), 2),
        )
        .unwrap();
        for _ in 0..4 {
            assert_eq!(game.tick(3, 3), None);
        }
        // Trail of length 2 keeps 3 cells: (5,6), (5,5), (5,4)
        let painted: usize = game
            .board()
            .rows()
            .iter()
            .flatten()
            .filter(|c| **c == Cell::PlayerOne)
            .count();
        assert_eq!(painted, 3);
        assert_eq!(game.board().cell(&Coord::new(5, 2)), Some(Cell::Empty));
        assert_eq!(game.board().cell(&Coord::new(5, 3)), Some(Cell::Empty));
        assert_eq!(game.board().cell(&Coord::new(5, 4)), Some(Cell::PlayerOne));
    }

    #[test]
    fn test_walls_survive_a_crash() {
        let mut game = state(10, Coord::new(1, 5), Coord::new(6, 2));
        game.tick(2, 4);
        assert_eq!(game.board().cell(&Coord::new(0, 5)), Some(Cell::Wall));
    }

    #[test]
    fn test_tick_after_game_over_is_ignored() {
        let mut game = state(10, Coord::new(1, 5), Coord::new(6, 2));
        game.tick(2, 4);
        let heads = (game.player_one().head(), game.player_two().head());
        assert_eq!(game.tick(4, 4), None);
        assert_eq!(heads, (game.player_one().head(), game.player_two().head()));
        assert_eq!(game.ticks(), 1);
        assert_eq!(game.winner(), Some(PlayerId::Two));
    }

    #[test]
    fn test_display_dumps_cell_codes() {
        let game = state(5, Coord::new(1, 3), Coord::new(3, 1));
        let dump = game.to_string();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "3 3 3 3 3");
        assert_eq!(lines[1], "3 0 0 1 3");
        assert_eq!(lines[3], "3 2 0 0 3");
    }
}
