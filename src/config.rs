//! Session and agent configuration.

use crate::error::GameError;
use crate::llm_client::{LlmConfig, LlmProvider};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Session configuration, set once at session start and immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Turns a placed mark stays on the board before decaying.
    #[serde(default = "default_decay_horizon")]
    decay_horizon: u32,

    /// Safety ceiling on the turn counter; reaching it forces a draw.
    #[serde(default = "default_max_turns")]
    max_turns: u32,

    /// Delay between auto-played turns, in milliseconds.
    #[serde(default = "default_turn_delay_ms")]
    turn_delay_ms: u64,

    /// Whether the scheduler drives turns automatically.
    #[serde(default = "default_auto_play")]
    auto_play: bool,
}

fn default_decay_horizon() -> u32 {
    7
}

fn default_max_turns() -> u32 {
    50
}

fn default_turn_delay_ms() -> u64 {
    1500
}

fn default_auto_play() -> bool {
    true
}

impl SessionConfig {
    /// Creates a session configuration.
    pub fn new(decay_horizon: u32, max_turns: u32, turn_delay_ms: u64, auto_play: bool) -> Self {
        Self {
            decay_horizon,
            max_turns,
            turn_delay_ms,
            auto_play,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            decay_horizon: default_decay_horizon(),
            max_turns: default_max_turns(),
            turn_delay_ms: default_turn_delay_ms(),
            auto_play: default_auto_play(),
        }
    }
}

/// Settings for one LLM-backed agent.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Agent display name, used in the move log.
    name: String,

    /// LLM provider (openai or anthropic).
    #[serde(default = "default_provider")]
    provider: LlmProvider,

    /// Model name, e.g. "gpt-4o-mini" or "claude-3-5-haiku".
    #[serde(default = "default_model")]
    model: String,

    /// Maximum tokens for the move response.
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,
}

fn default_provider() -> LlmProvider {
    LlmProvider::OpenAI
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    50
}

impl AgentSettings {
    /// Creates agent settings.
    pub fn new(name: String, provider: LlmProvider, model: String, max_tokens: u32) -> Self {
        Self {
            name,
            provider,
            model,
            max_tokens,
        }
    }

    /// Builds the LLM client configuration for this agent.
    ///
    /// Requires `OPENAI_API_KEY` or `ANTHROPIC_API_KEY` in the environment,
    /// depending on the provider.
    #[instrument(skip(self), fields(provider = ?self.provider, model = %self.model))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, GameError> {
        debug!("Creating LLM config");
        let api_key = match self.provider {
            LlmProvider::OpenAI => std::env::var("OPENAI_API_KEY").map_err(|_| {
                GameError::validation("OPENAI_API_KEY environment variable not set")
            })?,
            LlmProvider::Anthropic => std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
                GameError::validation("ANTHROPIC_API_KEY environment variable not set")
            })?,
        };
        Ok(LlmConfig::new(
            self.provider,
            api_key,
            self.model.clone(),
            self.max_tokens,
        ))
    }
}

/// Top-level configuration file: one session plus two agents.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Session parameters.
    #[serde(default)]
    session: SessionConfig,
    /// Agent playing X.
    agent_x: AgentSettings,
    /// Agent playing O.
    agent_o: AgentSettings,
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GameError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| GameError::validation(format!("failed to read config file: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| GameError::validation(format!("failed to parse config: {e}")))?;

        info!(
            agent_x = %config.agent_x.name(),
            agent_o = %config.agent_o.name(),
            "Config loaded successfully"
        );
        Ok(config)
    }
}
