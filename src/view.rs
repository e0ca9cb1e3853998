// Per-player state view sent to move sources
// One JSON object per request line; `x` is the row and `y` the column.

use serde::{Deserialize, Serialize};

use crate::engine::GameState;
use crate::player::Player;
use crate::types::{Coord, PlayerId};

/// A cell in wire form
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl From<Coord> for Point {
    fn from(c: Coord) -> Self {
        Point { x: c.row, y: c.col }
    }
}

impl From<Point> for Coord {
    fn from(p: Point) -> Self {
        Coord::new(p.x, p.y)
    }
}

/// One player's part of the view
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone)]
pub struct PlayerView {
    pub head: Option<Point>,
    pub trail: Vec<Point>,
    pub previous_move: i32,
}

impl PlayerView {
    pub fn of(player: &Player) -> Self {
        let trail: Vec<Point> = player.trail().map(Point::from).collect();
        PlayerView {
            head: trail.first().copied(),
            trail,
            previous_move: player.previous_move(),
        }
    }

    pub fn occupies(&self, coord: &Coord) -> bool {
        self.trail.iter().any(|p| Coord::from(*p) == *coord)
    }
}

/// Everything a move source gets to see, from the point of view of one player
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone)]
pub struct StateView {
    pub board_size: i32,
    pub walls: Vec<[i32; 2]>,
    #[serde(rename = "self")]
    pub you: PlayerView,
    pub opponent: PlayerView,
}

impl StateView {
    pub fn for_player(game: &GameState, id: PlayerId) -> Self {
        StateView {
            board_size: game.size(),
            walls: game
                .board()
                .walls()
                .iter()
                .map(|c| [c.row, c.col])
                .collect(),
            you: PlayerView::of(game.player(id)),
            opponent: PlayerView::of(game.player(id.opponent())),
        }
    }

    pub fn is_wall(&self, coord: &Coord) -> bool {
        self.walls.contains(&[coord.row, coord.col])
    }

    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim())
    }
}
