// Move-selection strategies for in-process agents and the demo agent binary
//
// A strategy only ever sees the serialized view, never the live GameState, so it
// behaves exactly like an external agent would.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{Coord, Direction};
use crate::view::StateView;

pub trait Strategy: Send {
    fn name(&self) -> &'static str;

    /// Returns a move code for the player described by `view.you`
    fn choose_move(&mut self, view: &StateView) -> i32;
}

/// Picks uniformly among the four directions, reversals included
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new() -> Self {
        RandomStrategy {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        RandomStrategy {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose_move(&mut self, _view: &StateView) -> i32 {
        let all = Direction::all();
        all[self.rng.random_range(0..all.len())].code()
    }
}

/// Random among the moves that do not immediately lose
pub struct CautiousStrategy {
    rng: StdRng,
}

impl CautiousStrategy {
    pub fn new() -> Self {
        CautiousStrategy {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        CautiousStrategy {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates the moves that survive one step.
    /// A move is kept if it:
    /// - Doesn't reverse the previous move
    /// - Doesn't enter a wall
    /// - Doesn't enter the opponent's trail or a cell the opponent's head can reach
    pub fn safe_moves(view: &StateView) -> Vec<Direction> {
        let Some(head) = view.you.head.map(Coord::from) else {
            return vec![];
        };
        let reverse = Direction::from_code(view.you.previous_move)
            .ok()
            .map(|d| d.opposite());
        let opponent_reach: Vec<Coord> = match view.opponent.head.map(Coord::from) {
            Some(h) => Direction::all().iter().map(|d| d.apply(&h)).collect(),
            None => vec![],
        };

        Direction::all()
            .iter()
            .filter(|&&dir| {
                if Some(dir) == reverse {
                    return false;
                }

                let next = dir.apply(&head);
                !view.is_wall(&next)
                    && !view.opponent.occupies(&next)
                    && !opponent_reach.contains(&next)
            })
            .copied()
            .collect()
    }
}

impl Default for CautiousStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for CautiousStrategy {
    fn name(&self) -> &'static str {
        "cautious"
    }

    fn choose_move(&mut self, view: &StateView) -> i32 {
        let safe = Self::safe_moves(view);
        if safe.is_empty() {
            // Nothing is safe; keep going straight (up on the first tick)
            return Direction::from_code(view.you.previous_move)
                .unwrap_or(Direction::Up)
                .code();
        }
        safe[self.rng.random_range(0..safe.len())].code()
    }
}

/// Looks a strategy up by its configured name
pub fn by_name(name: &str, seed: Option<u64>) -> Option<Box<dyn Strategy>> {
    match (name, seed) {
        ("random", Some(s)) => Some(Box::new(RandomStrategy::seeded(s))),
        ("random", None) => Some(Box::new(RandomStrategy::new())),
        ("cautious", Some(s)) => Some(Box::new(CautiousStrategy::seeded(s))),
        ("cautious", None) => Some(Box::new(CautiousStrategy::new())),
        _ => None,
    }
}
