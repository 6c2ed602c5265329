//! Agent move orchestration: request building, validation, retry, escalation.

use crate::agent::{MoveAgent, MoveRequest, MoveResponse};
use crate::analysis::DecayReport;
use crate::config::SessionConfig;
use crate::engine::GameEngine;
use crate::error::GameError;
use crate::game::{Coord, GameSnapshot, GameStatus, Symbol};
use crate::scheduler::AutoPlayScheduler;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Resolves free-form response text to a coordinate.
///
/// The pipeline short-circuits in order: token extraction (parsing error),
/// then range mapping (validation error). Occupancy is checked by the
/// engine at application time.
pub fn parse_coordinate(text: &str) -> Result<Coord, GameError> {
    let label = Coord::extract_label(text)?;
    Coord::from_label(&label)
}

/// Bounded retry with increasing backoff for transient failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Backoff before attempt n+1 is `base_backoff * n`.
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(500),
        }
    }
}

/// Result of one orchestrated agent turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The move was validated and applied; session is now in this status.
    Applied(GameStatus),
    /// The response no longer matched the expected request id (stale after a
    /// reset or retry) and was discarded without mutating state.
    StaleResponse,
}

/// Drives the session: solicits moves from the two agents one at a time,
/// validates responses, applies them through the engine, and escalates
/// failures.
///
/// Exactly one request may be outstanding; every request carries a unique
/// id and responses that do not echo the expected id are discarded.
pub struct Orchestrator {
    engine: Mutex<GameEngine>,
    agent_x: Arc<dyn MoveAgent>,
    agent_o: Arc<dyn MoveAgent>,
    retry: RetryPolicy,
    request_timeout: Duration,
    in_flight: Mutex<Option<Uuid>>,
    scheduler: Mutex<AutoPlayScheduler>,
}

impl Orchestrator {
    /// Creates an orchestrator for a fresh session.
    #[instrument(skip(agent_x, agent_o), fields(agent_x = agent_x.name(), agent_o = agent_o.name()))]
    pub fn new(
        config: SessionConfig,
        agent_x: Arc<dyn MoveAgent>,
        agent_o: Arc<dyn MoveAgent>,
    ) -> Self {
        info!("Creating orchestrator");
        Self {
            engine: Mutex::new(GameEngine::new(config)),
            agent_x,
            agent_o,
            retry: RetryPolicy::default(),
            request_timeout: Duration::from_secs(30),
            in_flight: Mutex::new(None),
            scheduler: Mutex::new(AutoPlayScheduler::new()),
        }
    }

    /// Overrides the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Overrides the hard per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Read-only snapshot for the control surface.
    pub fn snapshot(&self) -> GameSnapshot {
        self.engine.lock().unwrap().snapshot()
    }

    /// Current session status.
    pub fn status(&self) -> GameStatus {
        self.engine.lock().unwrap().state().status()
    }

    /// The last recorded error, if any.
    pub fn last_error(&self) -> Option<GameError> {
        self.engine.lock().unwrap().last_error().cloned()
    }

    /// Clears the last-error slot.
    pub fn clear_error(&self) {
        self.engine.lock().unwrap().clear_error();
    }

    /// Starts or resumes play without scheduling anything.
    pub fn start(&self) -> Result<(), GameError> {
        self.engine.lock().unwrap().start()
    }

    /// Starts play and, when the session is configured for auto-play,
    /// schedules the first agent turn.
    #[instrument(skip(self))]
    pub fn start_auto(self: &Arc<Self>) -> Result<(), GameError> {
        let auto_play = {
            let mut engine = self.engine.lock().unwrap();
            engine.start()?;
            *engine.state().config().auto_play()
        };
        if auto_play {
            self.schedule_next_turn();
        }
        Ok(())
    }

    /// Pauses play and cancels any pending scheduled turn.
    ///
    /// Cancelling can abort a turn mid-solicit, so the in-flight slot is
    /// released here; a response from the aborted request arrives against a
    /// rotated id and is discarded as stale.
    #[instrument(skip(self))]
    pub fn pause(&self) -> Result<(), GameError> {
        self.scheduler.lock().unwrap().cancel();
        *self.in_flight.lock().unwrap() = None;
        self.engine.lock().unwrap().pause()
    }

    /// Resets the session: cancels pending work, invalidates the expected
    /// request id so late responses are discarded, and rebuilds state.
    #[instrument(skip(self))]
    pub fn reset(&self) {
        self.scheduler.lock().unwrap().cancel();
        *self.in_flight.lock().unwrap() = None;
        self.engine.lock().unwrap().reset();
    }

    /// Operator override: resume after a fatal orchestration error.
    pub fn retry_after_halt(&self) -> Result<(), GameError> {
        self.engine.lock().unwrap().retry()
    }

    /// Applies a move typed in by a human, through the identical
    /// parse-then-apply pipeline as agent moves.
    ///
    /// Unlike agent failures, a bad manual entry does not halt the session;
    /// the error is recorded and surfaced for the next attempt.
    #[instrument(skip(self))]
    pub fn submit_manual_move(&self, text: &str) -> Result<GameStatus, GameError> {
        let mut engine = self.engine.lock().unwrap();
        let outcome = parse_coordinate(text).and_then(|coord| engine.apply_move(coord));
        match outcome {
            Ok(status) => {
                engine.clear_error();
                Ok(status)
            }
            Err(e) => {
                engine.record_error(e.clone());
                Err(e)
            }
        }
    }

    /// Schedules the next agent turn after the configured inter-turn delay.
    ///
    /// The callback re-schedules itself while the session keeps playing, so
    /// cancelling the scheduler (pause, reset, teardown) stops the chain.
    pub fn schedule_next_turn(self: &Arc<Self>) {
        let delay = {
            let engine = self.engine.lock().unwrap();
            Duration::from_millis(*engine.state().config().turn_delay_ms())
        };
        let this = Arc::clone(self);
        self.scheduler.lock().unwrap().schedule(delay, async move {
            match this.play_turn().await {
                Ok(TurnOutcome::Applied(GameStatus::Playing)) => this.schedule_next_turn(),
                Ok(outcome) => debug!(?outcome, "Auto-play chain stopping"),
                Err(e) => {
                    warn!(error = %e, "Auto-play turn failed");
                    // Unattended progression cannot continue without a legal
                    // move, so any turn failure is fatal here.
                    let mut engine = this.engine.lock().unwrap();
                    if engine.state().status() == GameStatus::Playing {
                        engine.halt(e);
                    }
                }
            }
        });
    }

    /// Runs one orchestrated agent turn: build request, solicit with retry,
    /// validate, apply.
    ///
    /// # Errors
    ///
    /// Exhausted transport retries escalate the session to error-halted.
    /// An unintelligible response or an illegal move is recorded in the
    /// error slot and returned while the session stays playing, so an
    /// operator can re-solicit or enter a move manually; under auto-play
    /// the scheduler escalates these to error-halted instead, since
    /// unattended progression cannot continue.
    #[instrument(skip(self))]
    pub async fn play_turn(&self) -> Result<TurnOutcome, GameError> {
        let (request, agent) = self.build_request()?;

        // Concurrency guard: one outstanding request per session.
        {
            let mut slot = self.in_flight.lock().unwrap();
            if slot.is_some() {
                return Err(GameError::validation(
                    "a move request is already in flight",
                ));
            }
            *slot = Some(request.request_id);
        }

        let solicited = self.solicit_with_retry(agent.as_ref(), &request).await;
        let response = match solicited {
            Ok(response) => response,
            Err(e) => {
                *self.in_flight.lock().unwrap() = None;
                self.engine.lock().unwrap().halt(e.clone());
                return Err(e);
            }
        };

        // A reset while the request was in flight rotates the expected id;
        // whatever arrives afterwards must not touch state.
        {
            let mut slot = self.in_flight.lock().unwrap();
            if *slot != Some(request.request_id) {
                warn!(request_id = %request.request_id, "Expected request id rotated, discarding response");
                return Ok(TurnOutcome::StaleResponse);
            }
            *slot = None;
        }
        if response.request_id != request.request_id {
            warn!(
                expected = %request.request_id,
                got = %response.request_id,
                "Discarding response with mismatched request id"
            );
            return Ok(TurnOutcome::StaleResponse);
        }

        let coord = match parse_coordinate(&response.coordinate) {
            Ok(coord) => coord,
            Err(e) => {
                // The agent is stateless per turn; guessing a legal move on
                // its behalf would corrupt the competitive contract. Record
                // and surface instead. State stays as it was.
                self.engine.lock().unwrap().record_error(e.clone());
                return Err(e);
            }
        };

        let mut engine = self.engine.lock().unwrap();
        match engine.apply_move(coord) {
            Ok(status) => {
                info!(agent = agent.name(), coordinate = %coord, %status, "Agent move applied");
                Ok(TurnOutcome::Applied(status))
            }
            Err(e) => {
                engine.record_error(e.clone());
                Err(e)
            }
        }
    }

    fn build_request(&self) -> Result<(MoveRequest, Arc<dyn MoveAgent>), GameError> {
        let engine = self.engine.lock().unwrap();
        if engine.state().status() != GameStatus::Playing {
            return Err(GameError::validation(format!(
                "cannot solicit a move while status is {}",
                engine.state().status()
            )));
        }
        let acting_symbol = engine.state().to_move();
        let request = MoveRequest {
            request_id: Uuid::new_v4(),
            snapshot: engine.snapshot(),
            acting_symbol,
            decay_report: Some(DecayReport::analyze(engine.state())),
        };
        let agent = match acting_symbol {
            Symbol::X => self.agent_x.clone(),
            Symbol::O => self.agent_o.clone(),
        };
        debug!(request_id = %request.request_id, agent = agent.name(), %acting_symbol, "Built move request");
        Ok((request, agent))
    }

    /// Solicits a response, retrying transient failures with increasing
    /// backoff. Each attempt is bounded by the hard request timeout,
    /// independent of any transport-level timeout.
    async fn solicit_with_retry(
        &self,
        agent: &dyn MoveAgent,
        request: &MoveRequest,
    ) -> Result<MoveResponse, GameError> {
        let mut last_error: Option<GameError> = None;
        for attempt in 1..=self.retry.max_attempts {
            match tokio::time::timeout(self.request_timeout, agent.propose_move(request)).await {
                Ok(Ok(response)) => return Ok(response),
                Ok(Err(e)) if e.is_transient() => {
                    warn!(attempt, error = %e, agent = agent.name(), "Transient agent failure");
                    last_error = Some(e);
                }
                Ok(Err(e)) => return Err(e),
                Err(_) => {
                    let e = GameError::transport(format!(
                        "agent {} did not respond within {:?}",
                        agent.name(),
                        self.request_timeout
                    ));
                    warn!(attempt, error = %e, "Request timed out");
                    last_error = Some(e);
                }
            }
            if attempt < self.retry.max_attempts {
                tokio::time::sleep(self.retry.base_backoff * attempt).await;
            }
        }
        Err(last_error
            .unwrap_or_else(|| GameError::transport("retry budget exhausted with no attempts")))
    }
}
