//! Mark decay: age, expiry, and the per-turn purge.

use super::moves::Move;
use tracing::{debug, instrument};

/// Turns a move has been on the board as of `current_turn`.
pub fn age(mv: &Move, current_turn: u32) -> u32 {
    current_turn.saturating_sub(mv.turn_number())
}

/// Whether a move has reached the decay horizon.
///
/// With a horizon of 7, a move placed at turn T is live for turns T through
/// T+6 inclusive and expired from turn T+7 onward.
pub fn is_expired(mv: &Move, current_turn: u32, horizon: u32) -> bool {
    age(mv, current_turn) >= horizon
}

/// Fraction of a move's life remaining, in `[0.0, 1.0]`.
///
/// A gradient signal for consumers that want one (prompt context, display);
/// expiry itself is strictly the boolean predicate above.
pub fn remaining_life(mv: &Move, current_turn: u32, horizon: u32) -> f64 {
    if horizon == 0 {
        return 0.0;
    }
    let left = horizon.saturating_sub(age(mv, current_turn));
    f64::from(left) / f64::from(horizon)
}

/// Removes expired moves from the active list, returning the removed moves.
///
/// Idempotent per turn number: a second invocation with the same
/// `current_turn` removes nothing further.
#[instrument(skip(moves), fields(active = moves.len()))]
pub fn purge_expired(moves: &mut Vec<Move>, current_turn: u32, horizon: u32) -> Vec<Move> {
    let mut expired = Vec::new();
    moves.retain(|mv| {
        if is_expired(mv, current_turn, horizon) {
            expired.push(mv.clone());
            false
        } else {
            true
        }
    });
    if !expired.is_empty() {
        debug!(
            expired = expired.len(),
            remaining = moves.len(),
            current_turn,
            "Purged expired moves"
        );
    }
    expired
}
