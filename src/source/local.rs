// In-process agent seat
// Decodes the same JSON view an external agent would receive and asks a strategy.

use log::error;

use super::MoveSource;
use crate::strategy::Strategy;
use crate::types::{PlayerId, SENTINEL_MOVE};
use crate::view::StateView;

pub struct LocalAgent {
    player: PlayerId,
    strategy: Box<dyn Strategy>,
}

impl LocalAgent {
    pub fn new(player: PlayerId, strategy: Box<dyn Strategy>) -> Self {
        LocalAgent { player, strategy }
    }
}

impl MoveSource for LocalAgent {
    fn name(&self) -> &str {
        self.strategy.name()
    }

    async fn initialize(&mut self) -> bool {
        true
    }

    async fn get_move(&mut self, state_view: &str) -> i32 {
        match StateView::from_line(state_view) {
            Ok(view) => self.strategy.choose_move(&view),
            Err(e) => {
                error!("{} could not decode its view: {}", self.player, e);
                SENTINEL_MOVE
            }
        }
    }

    async fn cleanup(&mut self) {}
}
