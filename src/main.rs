//! Decay-tac-toe session runner.
//!
//! Wires configuration, tracing, and two agents into an auto-played session.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use decay_tac_toe::{
    AppConfig, FirstEmptyAgent, GameStatus, LlmAgent, LlmClient, MoveAgent, Orchestrator,
    SessionConfig, Symbol,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let app_config = match &cli.config {
        Some(path) => Some(AppConfig::from_file(path).context("loading configuration")?),
        None => None,
    };

    let base = app_config
        .as_ref()
        .map(|c| *c.session())
        .unwrap_or_default();
    let session = SessionConfig::new(
        cli.horizon.unwrap_or(*base.decay_horizon()),
        cli.max_turns.unwrap_or(*base.max_turns()),
        cli.turn_delay_ms.unwrap_or(*base.turn_delay_ms()),
        true,
    );

    let (agent_x, agent_o) = build_agents(&cli, app_config.as_ref())?;
    info!(agent_x = agent_x.name(), agent_o = agent_o.name(), "Starting session");

    let orchestrator = Arc::new(Orchestrator::new(session, agent_x, agent_o));
    orchestrator.start_auto()?;

    let mut last_turn = 0;
    loop {
        tokio::time::sleep(Duration::from_millis(200)).await;
        let snapshot = orchestrator.snapshot();
        if snapshot.turn != last_turn {
            last_turn = snapshot.turn;
            println!("\nturn {} ({} to move)", snapshot.turn, snapshot.to_move);
            println!("{}", snapshot.board.display());
        }
        if snapshot.status.is_terminal() {
            match snapshot.status {
                GameStatus::Won(symbol) => println!("\n{symbol} wins"),
                GameStatus::Draw => println!("\ndraw"),
                GameStatus::ErrorHalted => {
                    if let Some(error) = orchestrator.last_error() {
                        eprintln!("\nsession halted: {error}");
                    }
                }
                _ => {}
            }
            println!("\nmove log:");
            for entry in &snapshot.move_log {
                println!("  {entry}");
            }
            break;
        }
    }

    Ok(())
}

fn build_agents(
    cli: &Cli,
    config: Option<&AppConfig>,
) -> Result<(Arc<dyn MoveAgent>, Arc<dyn MoveAgent>)> {
    let config = match config {
        Some(config) if !cli.builtin => config,
        _ => {
            return Ok((
                Arc::new(FirstEmptyAgent::new("Builtin X")),
                Arc::new(FirstEmptyAgent::new("Builtin O")),
            ))
        }
    };
    let agent = |settings: &decay_tac_toe::AgentSettings, symbol: Symbol| -> Result<Arc<dyn MoveAgent>> {
        let llm_config = settings
            .create_llm_config()
            .with_context(|| format!("configuring agent for {symbol}"))?;
        Ok(Arc::new(LlmAgent::new(
            settings.name().clone(),
            LlmClient::new(llm_config),
        )))
    };
    Ok((
        agent(config.agent_x(), Symbol::X)?,
        agent(config.agent_o(), Symbol::O)?,
    ))
}
