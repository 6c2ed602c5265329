//! The game state aggregate and its read-only snapshot.

use super::coord::Coord;
use super::decay;
use super::moves::Move;
use super::types::{Board, Symbol};
use crate::config::SessionConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "kebab-case")]
pub enum GameStatus {
    /// Session created, not yet started.
    #[display("not-started")]
    NotStarted,
    /// Turns are being played.
    #[display("playing")]
    Playing,
    /// Progression suspended; resumable via start.
    #[display("paused")]
    Paused,
    /// A symbol completed a line.
    #[display("won({_0})")]
    Won(Symbol),
    /// No winner and no playable continuation.
    #[display("draw")]
    Draw,
    /// A fatal orchestration error stopped the session.
    #[display("error-halted")]
    ErrorHalted,
}

impl GameStatus {
    /// Whether the session has ended.
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Won(_) | GameStatus::Draw | GameStatus::ErrorHalted)
    }
}

/// The canonical game state.
///
/// The active-move list is the source of truth; `board` is its projection
/// and is rebuilt after every change to the list. Mutation happens only
/// through the engine's orchestrated transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    active_moves: Vec<Move>,
    to_move: Symbol,
    turn: u32,
    status: GameStatus,
    winner: Option<Symbol>,
    move_log: Vec<String>,
    config: SessionConfig,
    next_move_id: u64,
}

impl GameState {
    /// Creates a fresh state for the given session configuration.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            board: Board::empty(),
            active_moves: Vec::new(),
            to_move: Symbol::X,
            turn: 1,
            status: GameStatus::NotStarted,
            winner: None,
            move_log: Vec::new(),
            config,
            next_move_id: 1,
        }
    }

    /// The board projection.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Active (non-decayed) moves.
    pub fn active_moves(&self) -> &[Move] {
        &self.active_moves
    }

    /// Symbol whose turn it is.
    pub fn to_move(&self) -> Symbol {
        self.to_move
    }

    /// Current turn number (starts at 1).
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Session status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Winner, if the session ended with one.
    pub fn winner(&self) -> Option<Symbol> {
        self.winner
    }

    /// Human-readable move log.
    pub fn move_log(&self) -> &[String] {
        &self.move_log
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Places a validated move for `to_move` and re-projects the board.
    ///
    /// Occupancy must already have been checked by the caller.
    pub(crate) fn place(&mut self, coord: Coord) -> Move {
        let mv = Move::new(self.next_move_id, coord, self.to_move, self.turn);
        self.next_move_id += 1;
        self.active_moves.push(mv.clone());
        self.board = Board::project(&self.active_moves);
        mv
    }

    /// Advances the turn counter.
    pub(crate) fn advance_turn(&mut self) {
        self.turn += 1;
    }

    /// Purges expired moves for the current turn and re-projects the board.
    /// Returns the moves that decayed.
    pub(crate) fn run_decay(&mut self) -> Vec<Move> {
        let expired =
            decay::purge_expired(&mut self.active_moves, self.turn, *self.config.decay_horizon());
        if !expired.is_empty() {
            self.board = Board::project(&self.active_moves);
        }
        expired
    }

    /// Flips the acting symbol.
    pub(crate) fn pass_turn(&mut self) {
        self.to_move = self.to_move.opponent();
    }

    pub(crate) fn set_status(&mut self, status: GameStatus) {
        debug!(from = %self.status, to = %status, "Status transition");
        self.status = status;
        if let GameStatus::Won(symbol) = status {
            self.winner = Some(symbol);
        }
    }

    pub(crate) fn log(&mut self, entry: String) {
        self.move_log.push(entry);
    }

    /// Builds a serializable read-only snapshot with derived decay data.
    pub fn snapshot(&self) -> GameSnapshot {
        let horizon = *self.config.decay_horizon();
        let moves = self
            .active_moves
            .iter()
            .map(|mv| MoveView {
                label: mv.label().to_string(),
                symbol: mv.symbol(),
                turn_number: mv.turn_number(),
                age: decay::age(mv, self.turn),
                remaining_life: decay::remaining_life(mv, self.turn, horizon),
            })
            .collect();

        GameSnapshot {
            board: self.board.clone(),
            active_moves: moves,
            to_move: self.to_move,
            turn: self.turn,
            status: self.status,
            winner: self.winner,
            decay_horizon: horizon,
            max_turns: *self.config.max_turns(),
            move_log: self.move_log.clone(),
        }
    }
}

/// An active move with derived decay data, as exposed to agents and renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveView {
    /// Coordinate label, e.g. "B2".
    pub label: String,
    /// Symbol placed.
    pub symbol: Symbol,
    /// Turn the move was placed on.
    pub turn_number: u32,
    /// Turns since placement.
    pub age: u32,
    /// Fraction of life remaining, in `[0.0, 1.0]`.
    pub remaining_life: f64,
}

/// Read-only view of a session, safe to serialize into an agent request
/// or hand to a rendering collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Board projection.
    pub board: Board,
    /// Active moves with derived age and remaining life.
    pub active_moves: Vec<MoveView>,
    /// Symbol to move.
    pub to_move: Symbol,
    /// Current turn number.
    pub turn: u32,
    /// Session status.
    pub status: GameStatus,
    /// Winner, if any.
    pub winner: Option<Symbol>,
    /// Decay horizon in turns.
    pub decay_horizon: u32,
    /// Maximum turns before the forced draw.
    pub max_turns: u32,
    /// Human-readable move log.
    pub move_log: Vec<String>,
}
