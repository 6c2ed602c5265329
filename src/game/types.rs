//! Symbols, cells, and the projected board.

use super::coord::Coord;
use super::moves::Move;
use serde::{Deserialize, Serialize};

/// A player symbol.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum Symbol {
    /// Symbol X (moves first).
    X,
    /// Symbol O (moves second).
    O,
}

impl Symbol {
    /// Returns the opposing symbol.
    pub fn opponent(self) -> Self {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// No live mark.
    Empty,
    /// Occupied by a live mark.
    Occupied(Symbol),
}

/// The 3x3 board projection.
///
/// A board is a cache, never a source of truth: the only way to write cells
/// is [`Board::project`], which derives the grid from an active-move list.
/// Cells that were occupied can become empty again purely through decay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Cells in row-major order (0-8).
    cells: [Cell; 9],
}

/// The 8 winning lines (3 rows, 3 columns, 2 diagonals), as cell indices.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

impl Board {
    /// Creates an empty board.
    pub fn empty() -> Self {
        Self {
            cells: [Cell::Empty; 9],
        }
    }

    /// Deterministically projects an active-move list onto a fresh grid.
    ///
    /// Moves are applied in ascending turn-number order, so if two moves ever
    /// claimed the same cell (the occupancy invariant forbids it) the later
    /// placement would win.
    pub fn project(moves: &[Move]) -> Self {
        let mut ordered: Vec<&Move> = moves.iter().collect();
        ordered.sort_by_key(|mv| mv.turn_number());

        let mut board = Self::empty();
        for mv in ordered {
            board.cells[mv.coord().index()] = Cell::Occupied(mv.symbol());
        }
        board
    }

    /// The cell at the given coordinate.
    pub fn cell(&self, coord: Coord) -> Cell {
        self.cells[coord.index()]
    }

    /// Whether the cell at the given coordinate is empty.
    pub fn is_empty(&self, coord: Coord) -> bool {
        self.cell(coord) == Cell::Empty
    }

    /// Whether no empty cell remains.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| *cell != Cell::Empty)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Checks the 8 lines for a winner.
    ///
    /// Pure function of the grid snapshot; knows nothing about decay timing.
    pub fn winner(&self) -> Option<Symbol> {
        for [a, b, c] in LINES {
            if let Cell::Occupied(symbol) = self.cells[a] {
                if self.cells[b] == Cell::Occupied(symbol) && self.cells[c] == Cell::Occupied(symbol)
                {
                    return Some(symbol);
                }
            }
        }
        None
    }

    /// Formats the board for prompts and the move log.
    pub fn display(&self) -> String {
        let mut result = String::from("    A   B   C\n");
        for row in 0..3 {
            result.push_str(&format!("{} ", row + 1));
            for col in 0..3 {
                let mark = match self.cells[row * 3 + col] {
                    Cell::Empty => " . ",
                    Cell::Occupied(Symbol::X) => " X ",
                    Cell::Occupied(Symbol::O) => " O ",
                };
                result.push_str(mark);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n  ---+---+---\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}
