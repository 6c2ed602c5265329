//! The move-proposing agent boundary.

use crate::analysis::DecayReport;
use crate::error::GameError;
use crate::game::{Coord, GameSnapshot, Symbol};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// Outbound request: everything an agent needs to pick a move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Unique id; the response must echo it to be accepted.
    pub request_id: Uuid,
    /// Read-only game state as of request issue.
    pub snapshot: GameSnapshot,
    /// Symbol the agent is moving as.
    pub acting_symbol: Symbol,
    /// Optional decay intelligence; correctness is unaffected if absent.
    pub decay_report: Option<DecayReport>,
}

/// Inbound response: free-form text that must resolve to a coordinate label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveResponse {
    /// Echo of the request id this response answers.
    pub request_id: Uuid,
    /// Proposed coordinate, e.g. "B2" (prose around it is tolerated).
    pub coordinate: String,
}

/// An external move-proposing party.
///
/// Implementations report only transport-level failures; whether the
/// proposed coordinate is legal is the orchestrator's judgement.
#[async_trait::async_trait]
pub trait MoveAgent: Send + Sync {
    /// Agent display name, used in logs.
    fn name(&self) -> &str;

    /// Proposes a move for the request's acting symbol.
    ///
    /// # Errors
    ///
    /// Returns a transport error when the underlying service fails.
    async fn propose_move(&self, request: &MoveRequest) -> Result<MoveResponse, GameError>;
}

/// Built-in agent that takes the first empty cell in row-major order.
///
/// Useful for demos and as a deterministic opponent when no LLM is wired up.
#[derive(Debug, Clone)]
pub struct FirstEmptyAgent {
    name: String,
}

impl FirstEmptyAgent {
    /// Creates a first-empty agent.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait::async_trait]
impl MoveAgent for FirstEmptyAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn propose_move(&self, request: &MoveRequest) -> Result<MoveResponse, GameError> {
        let coord = Coord::all()
            .find(|coord| request.snapshot.board.is_empty(*coord))
            .ok_or_else(|| GameError::transport("no empty cell to propose"))?;
        debug!(agent = %self.name, coordinate = %coord, "Proposing first empty cell");
        Ok(MoveResponse {
            request_id: request.request_id,
            coordinate: coord.label(),
        })
    }
}

/// One scripted step for a [`ScriptedAgent`].
#[derive(Debug, Clone)]
pub enum ScriptedStep {
    /// Respond with this text.
    Respond(String),
    /// Fail with a transport error.
    FailTransport,
    /// Respond, but stamped with an unrelated request id (stale response).
    RespondStale(String),
    /// Respond with this text after sleeping the given number of milliseconds.
    RespondSlow(u64, String),
}

/// Agent driven by a fixed script of responses and failures.
///
/// The workhorse of orchestrator tests: retries, stale ids, and malformed
/// responses are all expressible as steps.
pub struct ScriptedAgent {
    name: String,
    steps: Mutex<VecDeque<ScriptedStep>>,
}

impl ScriptedAgent {
    /// Creates a scripted agent from steps consumed in order.
    pub fn new(name: impl Into<String>, steps: Vec<ScriptedStep>) -> Self {
        Self {
            name: name.into(),
            steps: Mutex::new(steps.into()),
        }
    }
}

#[async_trait::async_trait]
impl MoveAgent for ScriptedAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn propose_move(&self, request: &MoveRequest) -> Result<MoveResponse, GameError> {
        let step = self
            .steps
            .lock()
            .expect("script mutex poisoned")
            .pop_front()
            .ok_or_else(|| GameError::transport("script exhausted"))?;
        match step {
            ScriptedStep::Respond(text) => Ok(MoveResponse {
                request_id: request.request_id,
                coordinate: text,
            }),
            ScriptedStep::FailTransport => {
                Err(GameError::transport("scripted transport failure"))
            }
            ScriptedStep::RespondStale(text) => Ok(MoveResponse {
                request_id: Uuid::new_v4(),
                coordinate: text,
            }),
            ScriptedStep::RespondSlow(delay_ms, text) => {
                tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                Ok(MoveResponse {
                    request_id: request.request_id,
                    coordinate: text,
                })
            }
        }
    }
}
