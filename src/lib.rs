//! Decay-tac-toe: tic-tac-toe where marks expire.
//!
//! Placed marks automatically decay after a fixed number of turns, so the
//! board is a continuously evolving projection of the active-move list
//! rather than a terminal static grid.
//!
//! # Architecture
//!
//! - **Game model**: coordinates, move records, board projection, win lines
//! - **Decay engine**: age, expiry, and the per-turn purge
//! - **Engine**: the turn state machine behind a single mutation entry point
//! - **Orchestrator**: solicits, validates, and applies agent moves with
//!   bounded retry and a cancellable auto-play scheduler
//! - **Analysis**: read-only decay intelligence for request context
//!
//! # Example
//!
//! ```no_run
//! use decay_tac_toe::{FirstEmptyAgent, Orchestrator, SessionConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let orchestrator = Arc::new(Orchestrator::new(
//!     SessionConfig::default(),
//!     Arc::new(FirstEmptyAgent::new("Alpha")),
//!     Arc::new(FirstEmptyAgent::new("Beta")),
//! ));
//! orchestrator.start_auto()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod agent;
mod analysis;
mod config;
mod engine;
mod error;
mod game;
mod llm_agent;
mod llm_client;
mod orchestrator;
mod scheduler;

// Crate-level exports - agent boundary
pub use agent::{FirstEmptyAgent, MoveAgent, MoveRequest, MoveResponse, ScriptedAgent, ScriptedStep};

// Crate-level exports - decay intelligence
pub use analysis::{DecayReport, MoveOutlook, Pressure};

// Crate-level exports - configuration
pub use config::{AgentSettings, AppConfig, SessionConfig};

// Crate-level exports - engine
pub use engine::GameEngine;

// Crate-level exports - errors
pub use error::{ErrorKind, GameError};

// Crate-level exports - game model
pub use game::{Board, Cell, Coord, GameSnapshot, GameState, GameStatus, Move, MoveView, Symbol};

// Crate-level exports - LLM agents
pub use llm_agent::LlmAgent;
pub use llm_client::{LlmClient, LlmConfig, LlmProvider};

// Crate-level exports - orchestration
pub use orchestrator::{parse_coordinate, Orchestrator, RetryPolicy, TurnOutcome};

// Crate-level exports - scheduling
pub use scheduler::AutoPlayScheduler;
