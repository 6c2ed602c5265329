//! Command-line interface for decay_tac_toe.

use clap::Parser;
use std::path::PathBuf;

/// Decay-tac-toe - tic-tac-toe with decaying marks, played by two agents
#[derive(Parser, Debug)]
#[command(name = "decay_tac_toe")]
#[command(about = "Run a decay-tac-toe session between two move-proposing agents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file (session + agents)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Use the built-in first-empty agents instead of LLM agents
    #[arg(long)]
    pub builtin: bool,

    /// Override the decay horizon in turns
    #[arg(long)]
    pub horizon: Option<u32>,

    /// Override the maximum number of turns
    #[arg(long)]
    pub max_turns: Option<u32>,

    /// Override the inter-turn delay in milliseconds
    #[arg(long)]
    pub turn_delay_ms: Option<u64>,
}
