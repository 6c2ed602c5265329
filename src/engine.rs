//! Turn state machine: the single mutation entry point for game state.

use crate::config::SessionConfig;
use crate::error::GameError;
use crate::game::{Coord, GameSnapshot, GameState, GameStatus};
use tracing::{info, instrument, warn};

/// Owns the canonical [`GameState`] and sequences every turn as one
/// transaction: apply move, evaluate winner, advance, decay, re-evaluate.
///
/// Nothing else writes to the board or the active-move list.
#[derive(Debug)]
pub struct GameEngine {
    state: GameState,
    last_error: Option<GameError>,
}

impl GameEngine {
    /// Creates an engine in the not-started state.
    #[instrument]
    pub fn new(config: SessionConfig) -> Self {
        info!(?config, "Creating game engine");
        Self {
            state: GameState::new(config),
            last_error: None,
        }
    }

    /// The current state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Read-only snapshot for agents and renderers.
    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot()
    }

    /// The last recorded error, if any.
    pub fn last_error(&self) -> Option<&GameError> {
        self.last_error.as_ref()
    }

    /// Records an error in the single queryable slot.
    pub fn record_error(&mut self, error: GameError) {
        self.last_error = Some(error);
    }

    /// Clears the error slot.
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Begins or resumes play.
    ///
    /// # Errors
    ///
    /// Returns a validation error unless the session is not-started or paused.
    #[instrument(skip(self), fields(status = %self.state.status()))]
    pub fn start(&mut self) -> Result<(), GameError> {
        match self.state.status() {
            GameStatus::NotStarted | GameStatus::Paused => {
                self.state.set_status(GameStatus::Playing);
                Ok(())
            }
            status => Err(GameError::validation(format!(
                "cannot start from status {status}"
            ))),
        }
    }

    /// Suspends play. The orchestrator cancels any scheduled turn alongside.
    ///
    /// # Errors
    ///
    /// Returns a validation error unless the session is playing.
    #[instrument(skip(self), fields(status = %self.state.status()))]
    pub fn pause(&mut self) -> Result<(), GameError> {
        match self.state.status() {
            GameStatus::Playing => {
                self.state.set_status(GameStatus::Paused);
                Ok(())
            }
            status => Err(GameError::validation(format!(
                "cannot pause from status {status}"
            ))),
        }
    }

    /// Discards the session and starts a fresh one with the same config.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        info!("Resetting session");
        self.state = GameState::new(*self.state.config());
        self.last_error = None;
    }

    /// Operator override: resume play after a fatal orchestration error.
    ///
    /// # Errors
    ///
    /// Returns a validation error unless the session is error-halted.
    #[instrument(skip(self), fields(status = %self.state.status()))]
    pub fn retry(&mut self) -> Result<(), GameError> {
        match self.state.status() {
            GameStatus::ErrorHalted => {
                self.last_error = None;
                self.state.set_status(GameStatus::Playing);
                Ok(())
            }
            status => Err(GameError::validation(format!(
                "cannot retry from status {status}"
            ))),
        }
    }

    /// Records a fatal orchestration error and halts the session.
    #[instrument(skip(self, error), fields(error = %error))]
    pub fn halt(&mut self, error: GameError) {
        warn!("Halting session on fatal error");
        self.last_error = Some(error);
        self.state.set_status(GameStatus::ErrorHalted);
    }

    /// Applies a validated coordinate as the acting symbol's move.
    ///
    /// The transaction order is fixed:
    /// 1. occupancy check, placement, board re-projection;
    /// 2. winner evaluation on the post-move board, before any decay —
    ///    a win recognized here is final even if decay would have removed
    ///    part of the line;
    /// 3. turn advancement, then decay at the new turn number;
    /// 4. draw evaluation on the post-decay board (decay can free cells, so
    ///    a board that looked full right after the move may keep playing);
    /// 5. the turn-limit safety valve, which forces a draw without fault.
    ///
    /// # Errors
    ///
    /// Returns a validation error, leaving state untouched, if the session
    /// is not playing or the target cell is occupied.
    #[instrument(skip(self), fields(turn = self.state.turn(), symbol = %self.state.to_move()))]
    pub fn apply_move(&mut self, coord: Coord) -> Result<GameStatus, GameError> {
        if self.state.status() != GameStatus::Playing {
            return Err(GameError::validation(format!(
                "moves are only accepted while playing, status is {}",
                self.state.status()
            )));
        }
        if !self.state.board().is_empty(coord) {
            return Err(GameError::validation(format!(
                "cell {} is already occupied",
                coord.label()
            )));
        }

        let symbol = self.state.to_move();
        let turn = self.state.turn();
        let mv = self.state.place(coord);
        self.state.log(format!("turn {turn}: {symbol} placed {}", mv.label()));
        info!(label = %mv.label(), %symbol, turn, "Move placed");

        // Winner is judged on the post-move, pre-decay board.
        if let Some(winner) = self.state.board().winner() {
            self.state.log(format!("turn {turn}: {winner} wins"));
            self.state.set_status(GameStatus::Won(winner));
            info!(%winner, "Game won");
            return Ok(self.state.status());
        }

        self.state.advance_turn();
        let expired = self.state.run_decay();
        for gone in &expired {
            self.state.log(format!(
                "turn {}: {} mark at {} decayed",
                self.state.turn(),
                gone.symbol(),
                gone.label()
            ));
        }

        // Draw is judged only after this turn's decay has run.
        if self.state.board().is_full() {
            self.state.log(format!("draw after {turn} turns"));
            self.state.set_status(GameStatus::Draw);
            info!("Game drawn on full board");
            return Ok(self.state.status());
        }

        if self.state.turn() >= *self.state.config().max_turns() {
            let max = *self.state.config().max_turns();
            self.state.log(format!("turn limit {max} reached, session drawn"));
            self.state.set_status(GameStatus::Draw);
            // Deterministic end-of-session condition, recorded as
            // informational rather than escalating to error-halted.
            self.record_error(GameError::turn_limit(format!(
                "turn counter reached the configured maximum of {max}"
            )));
            info!(max_turns = max, "Turn limit reached, forcing draw");
            return Ok(self.state.status());
        }

        self.state.pass_turn();
        Ok(self.state.status())
    }
}
