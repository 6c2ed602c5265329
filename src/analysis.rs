//! Read-only decay intelligence over a game state.
//!
//! Everything here is derived data for request context and display. The
//! engine never consults it; omitting the report changes nothing about
//! correctness.

use crate::game::decay;
use crate::game::{GameState, Symbol};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// How close a mark is to decaying, by thirds of remaining life.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Pressure {
    /// More than two thirds of its life left.
    #[display("fresh")]
    Fresh,
    /// Between one and two thirds left.
    #[display("aging")]
    Aging,
    /// A third or less left; decaying soon.
    #[display("critical")]
    Critical,
}

impl Pressure {
    /// Classifies a remaining-life fraction.
    pub fn classify(remaining_life: f64) -> Self {
        if remaining_life > 2.0 / 3.0 {
            Pressure::Fresh
        } else if remaining_life > 1.0 / 3.0 {
            Pressure::Aging
        } else {
            Pressure::Critical
        }
    }
}

/// Decay outlook for one active mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveOutlook {
    /// Coordinate label.
    pub label: String,
    /// Owning symbol.
    pub symbol: Symbol,
    /// Turns since placement.
    pub age: u32,
    /// Fraction of life remaining.
    pub remaining_life: f64,
    /// Turn on which the mark will decay.
    pub expires_on_turn: u32,
    /// Pressure classification.
    pub pressure: Pressure,
}

/// Aggregate decay report for the whole board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayReport {
    /// Per-mark outlooks, oldest first.
    pub outlooks: Vec<MoveOutlook>,
    /// Number of fresh marks.
    pub fresh: usize,
    /// Number of aging marks.
    pub aging: usize,
    /// Number of critical marks.
    pub critical: usize,
    /// The next turn at which at least one mark decays, if any are active.
    pub next_expiry_turn: Option<u32>,
}

impl DecayReport {
    /// Analyzes the current state.
    #[instrument(skip(state), fields(turn = state.turn(), active = state.active_moves().len()))]
    pub fn analyze(state: &GameState) -> Self {
        let turn = state.turn();
        let horizon = *state.config().decay_horizon();

        let mut outlooks: Vec<MoveOutlook> = state
            .active_moves()
            .iter()
            .map(|mv| {
                let remaining_life = decay::remaining_life(mv, turn, horizon);
                MoveOutlook {
                    label: mv.label().to_string(),
                    symbol: mv.symbol(),
                    age: decay::age(mv, turn),
                    remaining_life,
                    expires_on_turn: mv.turn_number() + horizon,
                    pressure: Pressure::classify(remaining_life),
                }
            })
            .collect();
        outlooks.sort_by(|a, b| b.age.cmp(&a.age));

        let count = |p: Pressure| outlooks.iter().filter(|o| o.pressure == p).count();
        Self {
            fresh: count(Pressure::Fresh),
            aging: count(Pressure::Aging),
            critical: count(Pressure::Critical),
            next_expiry_turn: outlooks.iter().map(|o| o.expires_on_turn).min(),
            outlooks,
        }
    }

    /// One-paragraph summary suitable for prompt context.
    pub fn summary(&self) -> String {
        if self.outlooks.is_empty() {
            return "No marks on the board yet.".to_string();
        }
        let mut lines = vec![format!(
            "{} active marks: {} fresh, {} aging, {} critical.",
            self.outlooks.len(),
            self.fresh,
            self.aging,
            self.critical
        )];
        for outlook in &self.outlooks {
            lines.push(format!(
                "{} at {} decays on turn {} ({} pressure)",
                outlook.symbol, outlook.label, outlook.expires_on_turn, outlook.pressure
            ));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::game::{Coord, GameState};

    fn state_with_moves(labels: &[(&str, u32)], current_turn: u32) -> GameState {
        let mut state = GameState::new(SessionConfig::default());
        state.set_status(crate::game::GameStatus::Playing);
        for (label, turn) in labels {
            while state.turn() < *turn {
                state.advance_turn();
            }
            state.place(Coord::from_label(label).unwrap());
            state.pass_turn();
        }
        while state.turn() < current_turn {
            state.advance_turn();
        }
        state
    }

    #[test]
    fn classification_by_thirds() {
        assert_eq!(Pressure::classify(1.0), Pressure::Fresh);
        assert_eq!(Pressure::classify(0.5), Pressure::Aging);
        assert_eq!(Pressure::classify(1.0 / 3.0), Pressure::Critical);
        assert_eq!(Pressure::classify(0.0), Pressure::Critical);
    }

    #[test]
    fn report_counts_and_next_expiry() {
        // Horizon 7: placed turn 1 -> expires turn 8; placed turn 6 -> 13.
        let state = state_with_moves(&[("A1", 1), ("B2", 6)], 7);
        let report = DecayReport::analyze(&state);
        assert_eq!(report.outlooks.len(), 2);
        assert_eq!(report.next_expiry_turn, Some(8));
        // A1 has age 6, remaining 1/7 -> critical; B2 age 1, remaining 6/7 -> fresh.
        assert_eq!(report.critical, 1);
        assert_eq!(report.fresh, 1);
        assert_eq!(report.outlooks[0].label, "A1");
    }

    #[test]
    fn empty_board_report() {
        let state = GameState::new(SessionConfig::default());
        let report = DecayReport::analyze(&state);
        assert!(report.outlooks.is_empty());
        assert_eq!(report.next_expiry_turn, None);
        assert!(report.summary().contains("No marks"));
    }
}
