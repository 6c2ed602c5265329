//! Error taxonomy for the game engine and orchestrator.

use chrono::{DateTime, Utc};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Classification of a game error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Illegal move: bad coordinate letter/digit, out-of-range, or cell occupied.
    #[display("validation")]
    Validation,
    /// Transport succeeded but the response contains no intelligible coordinate.
    #[display("parsing")]
    Parsing,
    /// Request failed or timed out at the network/service layer. Transient.
    #[display("transport")]
    Transport,
    /// The maximum-turns safety valve triggered. Informational, not a fault.
    #[display("timeout")]
    Timeout,
}

/// A classified, timestamped game error.
///
/// Captures the construction site via `#[track_caller]` so log output
/// points at the origin rather than the error module.
#[derive(Debug, Clone, Display, Error)]
#[display("{} error: {} at {}:{}", kind, message, file, line)]
pub struct GameError {
    /// Error classification.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
    /// When the error was created.
    pub at: DateTime<Utc>,
    /// Line number where the error was created.
    pub line: u32,
    /// Source file where the error was created.
    pub file: &'static str,
}

impl GameError {
    #[track_caller]
    fn with_kind(kind: ErrorKind, message: String) -> Self {
        let loc = std::panic::Location::caller();
        if kind != ErrorKind::Timeout {
            error!(%kind, error_message = %message, "Game error created");
        }
        Self {
            kind,
            message,
            at: Utc::now(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Creates a validation error (illegal move).
    #[track_caller]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Validation, message.into())
    }

    /// Creates a parsing error (unintelligible agent response).
    #[track_caller]
    pub fn parsing(message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Parsing, message.into())
    }

    /// Creates a transport error (network/service failure or request timeout).
    #[track_caller]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Transport, message.into())
    }

    /// Creates a timeout record for the maximum-turns safety valve.
    #[track_caller]
    pub fn turn_limit(message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Timeout, message.into())
    }

    /// Whether this error may be retried automatically.
    ///
    /// Only transport failures are transient; validation and parsing
    /// failures from an agent halt the session rather than being guessed
    /// around, and the turn-limit record is not a fault at all.
    pub fn is_transient(&self) -> bool {
        self.kind == ErrorKind::Transport
    }

    /// Whether this error represents a fault (anything but the turn-limit valve).
    pub fn is_fault(&self) -> bool {
        self.kind != ErrorKind::Timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_is_transient() {
        assert!(GameError::transport("connection refused").is_transient());
        assert!(!GameError::validation("cell occupied").is_transient());
        assert!(!GameError::parsing("no coordinate").is_transient());
    }

    #[test]
    fn turn_limit_is_not_a_fault() {
        let err = GameError::turn_limit("reached 50 turns");
        assert!(!err.is_fault());
        assert_eq!(err.kind, ErrorKind::Timeout);
    }

    #[test]
    fn display_includes_kind_and_location() {
        let err = GameError::validation("cell B2 is occupied");
        let text = err.to_string();
        assert!(text.contains("validation error"));
        assert!(text.contains("cell B2 is occupied"));
        assert!(text.contains("error.rs"));
    }
}
