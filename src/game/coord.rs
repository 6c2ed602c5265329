//! Coordinate labels and their mapping onto the 3x3 grid.

use crate::error::GameError;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A validated board coordinate.
///
/// Constructed only from a coordinate label: a column letter (A-C) followed
/// by a row digit (1-3), e.g. "B2". The letter maps to column 0-2 and the
/// digit to row 0-2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    row: u8,
    col: u8,
}

impl Coord {
    /// Parses a two-character coordinate label.
    ///
    /// The label must already have the letter-digit shape; callers that
    /// receive free-form text should extract a candidate token first (see
    /// [`Coord::extract_label`]).
    ///
    /// # Errors
    ///
    /// Returns a validation error if the letter is outside A-C or the digit
    /// outside 1-3.
    #[instrument]
    pub fn from_label(label: &str) -> Result<Self, GameError> {
        let mut chars = label.trim().chars();
        let (letter, digit) = match (chars.next(), chars.next(), chars.next()) {
            (Some(l), Some(d), None) => (l.to_ascii_uppercase(), d),
            _ => {
                return Err(GameError::validation(format!(
                    "coordinate label must be two characters, got {label:?}"
                )))
            }
        };

        let col = match letter {
            'A'..='C' => letter as u8 - b'A',
            _ => {
                return Err(GameError::validation(format!(
                    "column letter {letter:?} is out of range (expected A-C)"
                )))
            }
        };
        let row = match digit {
            '1'..='3' => digit as u8 - b'1',
            _ => {
                return Err(GameError::validation(format!(
                    "row digit {digit:?} is out of range (expected 1-3)"
                )))
            }
        };

        Ok(Self { row, col })
    }

    /// Extracts a letter-digit token from free-form response text.
    ///
    /// This is the syntactic shape check of the validation pipeline. The
    /// first in-range token (A-C, 1-3) wins, so prose that mentions an
    /// out-of-range pair before the intended move ("avoid X1, play B2")
    /// still resolves to the move. When no in-range token exists the first
    /// letter-digit pair is returned anyway, letting "D4" fail range
    /// validation later as a distinct error class.
    ///
    /// # Errors
    ///
    /// Returns a parsing error if no letter-digit pair exists in the text.
    #[instrument]
    pub fn extract_label(text: &str) -> Result<String, GameError> {
        let chars: Vec<char> = text.chars().collect();
        let mut fallback = None;
        for pair in chars.windows(2) {
            if pair[0].is_ascii_alphabetic() && pair[1].is_ascii_digit() {
                let letter = pair[0].to_ascii_uppercase();
                if ('A'..='C').contains(&letter) && ('1'..='3').contains(&pair[1]) {
                    return Ok(format!("{letter}{}", pair[1]));
                }
                fallback.get_or_insert_with(|| format!("{letter}{}", pair[1]));
            }
        }
        fallback.ok_or_else(|| {
            GameError::parsing(format!("no coordinate found in response {text:?}"))
        })
    }

    /// Row index (0-2).
    pub fn row(&self) -> usize {
        self.row as usize
    }

    /// Column index (0-2).
    pub fn col(&self) -> usize {
        self.col as usize
    }

    /// Row-major cell index (0-8).
    pub fn index(&self) -> usize {
        self.row() * 3 + self.col()
    }

    /// The canonical label, e.g. "B2".
    pub fn label(&self) -> String {
        format!("{}{}", (b'A' + self.col) as char, self.row + 1)
    }

    /// All nine coordinates in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..3u8).flat_map(|row| (0..3u8).map(move |col| Coord { row, col }))
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
