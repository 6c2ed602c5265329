//! LLM-backed move agent.

use crate::agent::{MoveAgent, MoveRequest, MoveResponse};
use crate::error::GameError;
use crate::llm_client::LlmClient;
use tracing::{debug, info};

/// Agent that asks an LLM for a coordinate.
///
/// Stateless per turn: every request carries the full snapshot, and the
/// response is returned verbatim for the orchestrator to validate.
pub struct LlmAgent {
    name: String,
    client: LlmClient,
}

impl LlmAgent {
    /// Creates an LLM agent.
    pub fn new(name: impl Into<String>, client: LlmClient) -> Self {
        let name = name.into();
        info!(agent = %name, "Creating LLM agent");
        Self { name, client }
    }

    fn user_message(request: &MoveRequest) -> String {
        let snapshot = &request.snapshot;
        let mut message = format!(
            "You are playing as {}. It is turn {} of at most {}.\n\n\
             Current board ('.' is empty):\n{}\n\n\
             Marks decay: each mark vanishes {} turns after it was placed.\n",
            request.acting_symbol,
            snapshot.turn,
            snapshot.max_turns,
            snapshot.board.display(),
            snapshot.decay_horizon,
        );
        if let Some(report) = &request.decay_report {
            message.push_str("\nDecay outlook:\n");
            message.push_str(&report.summary());
            message.push('\n');
        }
        message.push_str(
            "\nChoose an empty cell. Respond with ONLY its coordinate: \
             a column letter (A-C) followed by a row digit (1-3), e.g. B2.",
        );
        message
    }
}

#[async_trait::async_trait]
impl MoveAgent for LlmAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn propose_move(&self, request: &MoveRequest) -> Result<MoveResponse, GameError> {
        let system_prompt = format!(
            "You are {}, a competitive tic-tac-toe agent. Marks decay after a fixed \
             number of turns, so the board keeps changing. Always answer with a single \
             coordinate like B2 and nothing else.",
            self.name
        );
        let user_message = Self::user_message(request);

        debug!(agent = %self.name, request_id = %request.request_id, "Requesting move from LLM");
        let text = self.client.generate(&system_prompt, &user_message).await?;

        Ok(MoveResponse {
            request_id: request.request_id,
            coordinate: text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::DecayReport;
    use crate::config::SessionConfig;
    use crate::game::GameState;
    use uuid::Uuid;

    #[test]
    fn user_message_includes_board_and_decay_context() {
        let state = GameState::new(SessionConfig::default());
        let request = MoveRequest {
            request_id: Uuid::new_v4(),
            snapshot: state.snapshot(),
            acting_symbol: crate::game::Symbol::X,
            decay_report: Some(DecayReport::analyze(&state)),
        };
        let message = LlmAgent::user_message(&request);
        assert!(message.contains("turn 1"));
        assert!(message.contains("vanishes 7 turns"));
        assert!(message.contains("No marks"));
        assert!(message.contains("row digit"));
    }
}
