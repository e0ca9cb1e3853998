// Move collector
//
// Asks both seats for a move at the same time and waits for both answers. Each answer
// is then checked against the player's rules; sentinels, out-of-range codes and
// reversals are replaced by the player's previous move before the engine sees them.

use log::{error, warn};

use crate::engine::GameState;
use crate::player::Player;
use crate::source::MoveSource;
use crate::types::PlayerId;
use crate::view::StateView;

/// Serializes the view for one seat. An empty line is sent if encoding fails,
/// which every source answers with a sentinel.
pub fn view_line(game: &GameState, id: PlayerId) -> String {
    match StateView::for_player(game, id).to_line() {
        Ok(line) => line,
        Err(e) => {
            error!("Failed to serialize view for {}: {}", id, e);
            String::new()
        }
    }
}

/// Replaces an unusable move with the player's previous move (0 before the first tick,
/// which the player itself turns into "up")
pub fn sanitize_move(player: &Player, code: i32) -> i32 {
    match player.resolve_move(code) {
        Ok(dir) => dir.code(),
        Err(e) => {
            warn!(
                "{}: {}; substituting previous move {}",
                player.id(),
                e,
                player.previous_move()
            );
            player.previous_move()
        }
    }
}

/// Collects one tick's moves from both seats concurrently.
///
/// # Arguments
/// * `game` - Current state; only read to build the views
/// * `one` - Source for player 1
/// * `two` - Source for player 2
///
/// # Returns
/// * `(i32, i32)` - Sanitized move codes for player 1 and player 2
pub async fn collect_moves<A, B>(game: &GameState, one: &mut A, two: &mut B) -> (i32, i32)
where
    A: MoveSource,
    B: MoveSource,
{
    let view_one = view_line(game, PlayerId::One);
    let view_two = view_line(game, PlayerId::Two);

    let (raw_one, raw_two) = tokio::join!(one.get_move(&view_one), two.get_move(&view_two));

    (
        sanitize_move(game.player_one(), raw_one),
        sanitize_move(game.player_two(), raw_two),
    )
}
