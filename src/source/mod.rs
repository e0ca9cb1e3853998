// Move sources: where a seat's move comes from each tick
//
// Every source receives the same single-line JSON view and answers with an integer.
// Failures are reported as SENTINEL_MOVE, never as errors; the collector decides what
// to do with them. Seats are dispatched statically through the PlayerSource enum.

use std::future::Future;
use std::time::Duration;

use crate::config::{SeatConfig, SeatKind, TimingConfig};
use crate::error::ArenaError;
use crate::strategy;
use crate::types::PlayerId;

mod agent;
mod human;
mod local;

pub use agent::SubprocessAgent;
pub use human::{Console, HumanSource};
pub use local::LocalAgent;

pub trait MoveSource: Send {
    /// Short label used in log lines
    fn name(&self) -> &str;

    /// Prepares the source. Must be called once before `get_move`.
    fn initialize(&mut self) -> impl Future<Output = bool> + Send;

    /// Produces one move code for the given view, or SENTINEL_MOVE on failure
    fn get_move(&mut self, state_view: &str) -> impl Future<Output = i32> + Send;

    /// Releases everything the source holds. Safe to call at any point, repeatedly.
    fn cleanup(&mut self) -> impl Future<Output = ()> + Send;
}

/// A seat's source as chosen by configuration
pub enum PlayerSource {
    Human(HumanSource),
    Agent(SubprocessAgent),
    Local(LocalAgent),
}

impl PlayerSource {
    /// Builds the source for a seat
    ///
    /// # Arguments
    /// * `player` - The seat being filled
    /// * `seat` - The seat's configuration
    /// * `timing` - Bounded waits applied to external agents
    /// * `console` - Terminal shared by all human seats
    pub fn from_config(
        player: PlayerId,
        seat: &SeatConfig,
        timing: &TimingConfig,
        console: &Console,
    ) -> Result<Self, ArenaError> {
        match seat.kind {
            SeatKind::Human => Ok(PlayerSource::Human(HumanSource::new(player, console.clone()))),
            SeatKind::Agent => {
                let move_timeout = match timing.move_timeout_ms {
                    0 => None,
                    ms => Some(Duration::from_millis(ms)),
                };
                Ok(PlayerSource::Agent(
                    SubprocessAgent::new(player, seat.command.clone())
                        .with_move_timeout(move_timeout)
                        .with_cleanup_timeout(Duration::from_millis(timing.cleanup_timeout_ms)),
                ))
            }
            SeatKind::Local => {
                let strategy = strategy::by_name(&seat.strategy, seat.seed).ok_or_else(|| {
                    ArenaError::Config(format!("unknown strategy '{}'", seat.strategy))
                })?;
                Ok(PlayerSource::Local(LocalAgent::new(player, strategy)))
            }
        }
    }
}

impl MoveSource for PlayerSource {
    fn name(&self) -> &str {
        match self {
            PlayerSource::Human(s) => s.name(),
            PlayerSource::Agent(s) => s.name(),
            PlayerSource::Local(s) => s.name(),
        }
    }

    async fn initialize(&mut self) -> bool {
        match self {
            PlayerSource::Human(s) => s.initialize().await,
            PlayerSource::Agent(s) => s.initialize().await,
            PlayerSource::Local(s) => s.initialize().await,
        }
    }

    async fn get_move(&mut self, state_view: &str) -> i32 {
        match self {
            PlayerSource::Human(s) => s.get_move(state_view).await,
            PlayerSource::Agent(s) => s.get_move(state_view).await,
            PlayerSource::Local(s) => s.get_move(state_view).await,
        }
    }

    async fn cleanup(&mut self) {
        match self {
            PlayerSource::Human(s) => s.cleanup().await,
            PlayerSource::Agent(s) => s.cleanup().await,
            PlayerSource::Local(s) => s.cleanup().await,
        }
    }
}
