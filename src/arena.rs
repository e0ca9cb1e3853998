// Match runner
//
// Lifecycle of one match: initialize both seats, tick until an outcome, clean up both
// seats. Cleanup runs on every exit path once initialization has been attempted.

use log::{debug, error, info, warn};
use std::time::Duration;

use crate::collector::collect_moves;
use crate::config::Config;
use crate::engine::GameState;
use crate::error::ArenaError;
use crate::source::MoveSource;
use crate::types::{Outcome, PlayerId};

/// Result of a finished match
#[derive(Debug, Clone)]
pub struct MatchReport {
    pub outcome: Outcome,
    pub ticks: u64,
    pub final_state: GameState,
}

impl MatchReport {
    pub fn winner(&self) -> Option<PlayerId> {
        self.outcome.winner()
    }
}

pub struct Arena {
    size: i32,
    trail_length: usize,
    tick_delay: Duration,
}

impl Arena {
    pub fn new(config: &Config) -> Self {
        Arena {
            size: config.board.size,
            trail_length: config.board.trail_length,
            tick_delay: Duration::from_millis(config.timing.tick_delay_ms),
        }
    }

    /// Arena without pacing
    pub fn with_board(size: i32, trail_length: usize) -> Self {
        Arena {
            size,
            trail_length,
            tick_delay: Duration::ZERO,
        }
    }

    pub fn with_tick_delay(mut self, tick_delay: Duration) -> Self {
        self.tick_delay = tick_delay;
        self
    }

    /// Plays a match on a freshly spawned board
    pub async fn run<A, B>(&self, one: &mut A, two: &mut B) -> Result<MatchReport, ArenaError>
    where
        A: MoveSource,
        B: MoveSource,
    {
        let game = GameState::new(self.size, self.trail_length)?;
        self.run_game(game, one, two).await
    }

    /// Plays a match starting from `game`.
    ///
    /// # Returns
    /// * `Ok(MatchReport)` - The match reached a win or a draw
    /// * `Err(ArenaError::SourceInitialization)` - A seat failed to start; no tick was played
    /// * `Err(ArenaError::Interrupted)` - Ctrl-C arrived mid-match
    pub async fn run_game<A, B>(
        &self,
        mut game: GameState,
        one: &mut A,
        two: &mut B,
    ) -> Result<MatchReport, ArenaError>
    where
        A: MoveSource,
        B: MoveSource,
    {
        let (ready_one, ready_two) = tokio::join!(one.initialize(), two.initialize());
        if !ready_one || !ready_two {
            let (player, source_name) = if !ready_one {
                (PlayerId::One, one.name().to_string())
            } else {
                (PlayerId::Two, two.name().to_string())
            };
            error!("Could not start {} ({}); aborting match", player, source_name);
            tokio::join!(one.cleanup(), two.cleanup());
            return Err(ArenaError::SourceInitialization {
                player,
                source_name,
            });
        }

        info!(
            "Match start: {} ({}) at {:?} vs {} ({}) at {:?}",
            PlayerId::One,
            one.name(),
            game.player_one().head(),
            PlayerId::Two,
            two.name(),
            game.player_two().head()
        );
        debug!("\n{}", game);

        let result = tokio::select! {
            outcome = Self::play(&mut game, one, two, self.tick_delay) => Ok(outcome),
            _ = interrupted() => Err(ArenaError::Interrupted),
        };

        tokio::join!(one.cleanup(), two.cleanup());

        let outcome = result?;
        info!("Match over after {} ticks: {}", game.ticks(), outcome);
        Ok(MatchReport {
            outcome,
            ticks: game.ticks(),
            final_state: game,
        })
    }

    async fn play<A, B>(game: &mut GameState, one: &mut A, two: &mut B, delay: Duration) -> Outcome
    where
        A: MoveSource,
        B: MoveSource,
    {
        loop {
            let (move_one, move_two) = collect_moves(game, one, two).await;
            let outcome = game.tick(move_one, move_two);
            debug!("\n{}", game);

            if let Some(outcome) = outcome {
                return outcome;
            }
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Resolves on Ctrl-C. Never resolves if the signal handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
