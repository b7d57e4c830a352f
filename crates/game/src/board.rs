use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use tictactoe_core::{DomainError, DomainResult};

use crate::player::Player;

/// Largest accepted board side. Views render the whole grid, so the side is capped.
pub const MAX_BOARD_SIDE: i64 = 100;

/// A board coordinate.
///
/// Coordinates are signed so that out-of-range input (including negatives) reaches
/// [`Board::validate`] and is rejected there rather than at deserialization.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: i64,
    pub col: i64,
}

impl Cell {
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }
}

/// Square grid of `side × side` cells and who owns them.
///
/// Every occupied cell is within bounds: callers validate before moving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    side: i64,
    occupied: HashMap<Cell, Player>,
}

impl Board {
    pub fn create(side: i64) -> DomainResult<Self> {
        if side < 1 {
            return Err(DomainError::validation("Non-positive board side given"));
        }
        if side > MAX_BOARD_SIDE {
            return Err(DomainError::validation(format!(
                "Board side must not exceed {MAX_BOARD_SIDE}"
            )));
        }
        Ok(Self {
            side,
            occupied: HashMap::new(),
        })
    }

    pub fn side(&self) -> i64 {
        self.side
    }

    /// Total number of cells.
    pub fn size(&self) -> usize {
        (self.side * self.side) as usize
    }

    pub fn owner(&self, cell: &Cell) -> Option<&Player> {
        self.occupied.get(cell)
    }

    pub fn occupied(&self) -> &HashMap<Cell, Player> {
        &self.occupied
    }

    pub fn has_available_cells(&self) -> bool {
        self.occupied.len() < self.size()
    }

    /// Check a cell against the board bounds and its availability.
    pub fn validate(&self, cell: &Cell) -> DomainResult<()> {
        if !self.in_bounds(cell) {
            return Err(DomainError::validation("Cell is out of bounds"));
        }
        if self.occupied.contains_key(cell) {
            return Err(DomainError::rule("Cell is unavailable"));
        }
        Ok(())
    }

    /// Record ownership of `cell`. No checks; call [`Board::validate`] first.
    pub fn mark(&mut self, cell: Cell, player: Player) {
        self.occupied.insert(cell, player);
    }

    /// Whether `cell` completes a full line for its owner.
    ///
    /// Lines are the cell's row and column, plus each diagonal the cell lies on.
    pub fn is_winning(&self, cell: &Cell) -> bool {
        let Some(player) = self.owner(cell) else {
            return false;
        };
        let last = self.side - 1;

        let row = self.owns_line(player, |i| Cell::new(cell.row, i));
        let col = self.owns_line(player, |i| Cell::new(i, cell.col));
        let main = cell.row == cell.col && self.owns_line(player, |i| Cell::new(i, i));
        let anti = cell.row + cell.col == last && self.owns_line(player, |i| Cell::new(i, last - i));

        row || col || main || anti
    }

    fn owns_line(&self, player: &Player, line: impl Fn(i64) -> Cell) -> bool {
        (0..self.side).all(|i| self.owner(&line(i)) == Some(player))
    }

    fn in_bounds(&self, cell: &Cell) -> bool {
        (0..self.side).contains(&cell.row) && (0..self.side).contains(&cell.col)
    }
}
