// Board and wall model
//
// The grid is square with a one-cell wall border. Wall membership is decided by the
// wall set computed at construction; the cell grid is only a painted picture of it.

use std::collections::BTreeSet;

use crate::error::ArenaError;
use crate::types::{Cell, Coord};

/// Smallest board that still leaves room for both spawn triangles
pub const MIN_BOARD_SIZE: i32 = 5;

#[derive(Debug, Clone)]
pub struct Board {
    size: i32,
    cells: Vec<Vec<Cell>>,
    walls: BTreeSet<Coord>,
}

impl Board {
    /// Builds an N x N board: every cell empty, then the border overwritten with walls
    pub fn new(size: i32) -> Result<Self, ArenaError> {
        if size < MIN_BOARD_SIZE {
            return Err(ArenaError::BoardTooSmall {
                size,
                min: MIN_BOARD_SIZE,
            });
        }

        let n = size as usize;
        let mut board = Board {
            size,
            cells: vec![vec![Cell::Empty; n]; n],
            walls: BTreeSet::new(),
        };

        let last = size - 1;
        for i in 0..size {
            for coord in [
                Coord::new(0, i),
                Coord::new(last, i),
                Coord::new(i, 0),
                Coord::new(i, last),
            ] {
                board.walls.insert(coord);
                board.cells[coord.row as usize][coord.col as usize] = Cell::Wall;
            }
        }

        Ok(board)
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn walls(&self) -> &BTreeSet<Coord> {
        &self.walls
    }

    pub fn is_wall(&self, coord: &Coord) -> bool {
        self.walls.contains(coord)
    }

    pub fn in_bounds(&self, coord: &Coord) -> bool {
        coord.row >= 0 && coord.row < self.size && coord.col >= 0 && coord.col < self.size
    }

    /// Returns the cell at `coord`, or None when it lies outside the grid
    pub fn cell(&self, coord: &Coord) -> Option<Cell> {
        if !self.in_bounds(coord) {
            return None;
        }
        Some(self.cells[coord.row as usize][coord.col as usize])
    }

    /// Paints a cell. Wall cells and out-of-grid coordinates are left untouched.
    pub fn paint(&mut self, coord: &Coord, cell: Cell) {
        if !self.in_bounds(coord) || self.is_wall(coord) {
            return;
        }
        self.cells[coord.row as usize][coord.col as usize] = cell;
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.cells
    }
}
