//! Move records.

use super::coord::Coord;
use super::types::Symbol;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A placed mark.
///
/// Immutable after creation: a move is never updated in place, only removed
/// from the active list once it reaches the decay horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    id: u64,
    coord: Coord,
    label: String,
    symbol: Symbol,
    turn_number: u32,
    placed_at: DateTime<Utc>,
}

impl Move {
    /// Creates a move record for a validated, legal placement.
    pub(crate) fn new(id: u64, coord: Coord, symbol: Symbol, turn_number: u32) -> Self {
        Self {
            id,
            coord,
            label: coord.label(),
            symbol,
            turn_number,
            placed_at: Utc::now(),
        }
    }

    /// Session-unique move id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Board coordinate.
    pub fn coord(&self) -> Coord {
        self.coord
    }

    /// Coordinate label, e.g. "B2".
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The symbol placed.
    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    /// Turn on which the move was placed.
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Wall-clock creation time.
    pub fn placed_at(&self) -> DateTime<Utc> {
        self.placed_at
    }
}
