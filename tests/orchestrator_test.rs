//! Tests for agent move orchestration: validation pipeline, retry policy,
//! request-id discipline, and the auto-play scheduler.

use decay_tac_toe::{
    Coord, ErrorKind, FirstEmptyAgent, GameStatus, MoveAgent, Orchestrator, RetryPolicy,
    ScriptedAgent, ScriptedStep, SessionConfig, Symbol, TurnOutcome,
};
use std::sync::Arc;
use std::time::Duration;

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_backoff: Duration::from_millis(5),
    }
}

fn orchestrator(
    agent_x: Arc<dyn MoveAgent>,
    agent_o: Arc<dyn MoveAgent>,
    config: SessionConfig,
) -> Arc<Orchestrator> {
    Arc::new(
        Orchestrator::new(config, agent_x, agent_o)
            .with_retry_policy(fast_retry())
            .with_request_timeout(Duration::from_secs(2)),
    )
}

fn scripted(steps: Vec<ScriptedStep>) -> Arc<dyn MoveAgent> {
    Arc::new(ScriptedAgent::new("scripted", steps))
}

fn idle() -> Arc<dyn MoveAgent> {
    Arc::new(ScriptedAgent::new("idle", vec![]))
}

#[tokio::test]
async fn out_of_range_coordinate_is_recorded_not_applied() {
    let orch = orchestrator(
        scripted(vec![ScriptedStep::Respond("D4".to_string())]),
        idle(),
        SessionConfig::default(),
    );
    orch.start().unwrap();

    let err = orch.play_turn().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let snapshot = orch.snapshot();
    assert!(snapshot.active_moves.is_empty());
    assert_eq!(snapshot.status, GameStatus::Playing);
    assert_eq!(orch.last_error().unwrap().kind, ErrorKind::Validation);
}

#[tokio::test]
async fn unintelligible_response_is_a_parsing_error() {
    let orch = orchestrator(
        scripted(vec![ScriptedStep::Respond(
            "the center square looks strong".to_string(),
        )]),
        idle(),
        SessionConfig::default(),
    );
    orch.start().unwrap();

    let err = orch.play_turn().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Parsing);
    assert_eq!(orch.status(), GameStatus::Playing);
    assert!(orch.snapshot().active_moves.is_empty());
}

#[tokio::test]
async fn occupied_cell_proposal_leaves_state_unchanged() {
    let orch = orchestrator(
        scripted(vec![ScriptedStep::Respond("A1".to_string())]),
        scripted(vec![ScriptedStep::Respond("A1".to_string())]),
        SessionConfig::default(),
    );
    orch.start().unwrap();

    assert_eq!(
        orch.play_turn().await.unwrap(),
        TurnOutcome::Applied(GameStatus::Playing)
    );
    let before = orch.snapshot();

    let err = orch.play_turn().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(orch.snapshot(), before);
    assert_eq!(orch.status(), GameStatus::Playing);
}

#[tokio::test]
async fn transport_errors_within_retry_budget_recover() {
    let orch = orchestrator(
        scripted(vec![
            ScriptedStep::FailTransport,
            ScriptedStep::FailTransport,
            ScriptedStep::Respond("B2".to_string()),
        ]),
        idle(),
        SessionConfig::default(),
    );
    orch.start().unwrap();

    let outcome = orch.play_turn().await.unwrap();
    assert_eq!(outcome, TurnOutcome::Applied(GameStatus::Playing));

    let snapshot = orch.snapshot();
    assert_eq!(snapshot.active_moves.len(), 1);
    assert_eq!(snapshot.active_moves[0].label, "B2");
    assert_eq!(snapshot.status, GameStatus::Playing);
    assert!(orch.last_error().is_none());
}

#[tokio::test]
async fn exhausted_transport_retries_halt_the_session() {
    let orch = orchestrator(
        scripted(vec![
            ScriptedStep::FailTransport,
            ScriptedStep::FailTransport,
            ScriptedStep::FailTransport,
        ]),
        idle(),
        SessionConfig::default(),
    );
    orch.start().unwrap();

    let err = orch.play_turn().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Transport);
    assert_eq!(orch.status(), GameStatus::ErrorHalted);
    assert_eq!(orch.last_error().unwrap().kind, ErrorKind::Transport);

    // Operator override resumes play.
    orch.retry_after_halt().unwrap();
    assert_eq!(orch.status(), GameStatus::Playing);
    assert!(orch.last_error().is_none());
}

#[tokio::test]
async fn response_with_mismatched_request_id_is_discarded() {
    let orch = orchestrator(
        scripted(vec![ScriptedStep::RespondStale("B2".to_string())]),
        idle(),
        SessionConfig::default(),
    );
    orch.start().unwrap();

    let outcome = orch.play_turn().await.unwrap();
    assert_eq!(outcome, TurnOutcome::StaleResponse);
    assert!(orch.snapshot().active_moves.is_empty());
    assert_eq!(orch.status(), GameStatus::Playing);
}

#[tokio::test]
async fn reset_during_flight_invalidates_the_response() {
    let orch = orchestrator(
        scripted(vec![ScriptedStep::RespondSlow(200, "A1".to_string())]),
        idle(),
        SessionConfig::default(),
    );
    orch.start().unwrap();

    let runner = Arc::clone(&orch);
    let handle = tokio::spawn(async move { runner.play_turn().await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    orch.reset();

    let outcome = handle.await.unwrap().unwrap();
    assert_eq!(outcome, TurnOutcome::StaleResponse);
    assert_eq!(orch.status(), GameStatus::NotStarted);
    assert!(orch.snapshot().active_moves.is_empty());
    assert_eq!(orch.snapshot().turn, 1);
}

#[tokio::test]
async fn pause_during_flight_releases_the_guard() {
    let orch = orchestrator(
        scripted(vec![
            ScriptedStep::RespondSlow(200, "A1".to_string()),
            ScriptedStep::Respond("B2".to_string()),
        ]),
        idle(),
        SessionConfig::default(),
    );
    orch.start().unwrap();

    let runner = Arc::clone(&orch);
    let handle = tokio::spawn(async move { runner.play_turn().await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    orch.pause().unwrap();

    // The paused-over response arrives against a rotated id.
    let outcome = handle.await.unwrap().unwrap();
    assert_eq!(outcome, TurnOutcome::StaleResponse);
    assert!(orch.snapshot().active_moves.is_empty());

    // Resuming must not trip the in-flight guard: no request is outstanding.
    orch.start().unwrap();
    let outcome = orch.play_turn().await.unwrap();
    assert_eq!(outcome, TurnOutcome::Applied(GameStatus::Playing));
    assert_eq!(orch.snapshot().active_moves[0].label, "B2");
}

#[tokio::test]
async fn only_one_request_may_be_in_flight() {
    let orch = orchestrator(
        scripted(vec![ScriptedStep::RespondSlow(200, "A1".to_string())]),
        idle(),
        SessionConfig::default(),
    );
    orch.start().unwrap();

    let runner = Arc::clone(&orch);
    let handle = tokio::spawn(async move { runner.play_turn().await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let err = orch.play_turn().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(err.message.contains("in flight"));

    // The original request is unaffected by the rejected second one.
    let outcome = handle.await.unwrap().unwrap();
    assert_eq!(outcome, TurnOutcome::Applied(GameStatus::Playing));
    assert_eq!(orch.snapshot().active_moves.len(), 1);
}

#[tokio::test]
async fn hard_request_timeout_classifies_as_transport() {
    let orch = Arc::new(
        Orchestrator::new(
            SessionConfig::default(),
            scripted(vec![ScriptedStep::RespondSlow(500, "A1".to_string())]),
            idle(),
        )
        .with_retry_policy(RetryPolicy {
            max_attempts: 1,
            base_backoff: Duration::from_millis(1),
        })
        .with_request_timeout(Duration::from_millis(20)),
    );
    orch.start().unwrap();

    let err = orch.play_turn().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Transport);
    assert!(err.message.contains("did not respond"));
    assert_eq!(orch.status(), GameStatus::ErrorHalted);
}

#[tokio::test]
async fn manual_moves_use_the_same_pipeline() {
    let orch = orchestrator(idle(), idle(), SessionConfig::default());
    orch.start().unwrap();

    let status = orch.submit_manual_move("b2 please").unwrap();
    assert_eq!(status, GameStatus::Playing);
    let snapshot = orch.snapshot();
    assert_eq!(snapshot.active_moves[0].label, "B2");
    assert_eq!(snapshot.active_moves[0].symbol, Symbol::X);

    let err = orch.submit_manual_move("D4").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(orch.status(), GameStatus::Playing);
    assert_eq!(orch.last_error().unwrap().kind, ErrorKind::Validation);

    orch.clear_error();
    assert!(orch.last_error().is_none());
}

#[tokio::test]
async fn auto_play_runs_to_a_terminal_status() {
    let orch = orchestrator(
        Arc::new(FirstEmptyAgent::new("Alpha")),
        Arc::new(FirstEmptyAgent::new("Beta")),
        SessionConfig::new(7, 50, 1, true),
    );
    orch.start_auto().unwrap();

    for _ in 0..200 {
        if orch.status().is_terminal() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    // First-empty play: X takes A1, C1, B2, then A3 for the C1-B2-A3 diagonal.
    assert_eq!(orch.status(), GameStatus::Won(Symbol::X));
    assert_eq!(orch.snapshot().winner, Some(Symbol::X));
}

#[tokio::test]
async fn pause_cancels_the_scheduled_turn() {
    let orch = orchestrator(
        Arc::new(FirstEmptyAgent::new("Alpha")),
        Arc::new(FirstEmptyAgent::new("Beta")),
        SessionConfig::new(7, 50, 150, true),
    );
    orch.start_auto().unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    orch.pause().unwrap();

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(orch.status(), GameStatus::Paused);
    assert_eq!(orch.snapshot().turn, 1);
    assert!(orch.snapshot().active_moves.is_empty());
}

#[tokio::test]
async fn auto_play_escalates_agent_validation_failure() {
    // Under unattended progression a bad agent response is fatal.
    let orch = orchestrator(
        scripted(vec![ScriptedStep::Respond("D4".to_string())]),
        idle(),
        SessionConfig::new(7, 50, 1, true),
    );
    orch.start_auto().unwrap();

    for _ in 0..100 {
        if orch.status() == GameStatus::ErrorHalted {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(orch.status(), GameStatus::ErrorHalted);
    assert_eq!(orch.last_error().unwrap().kind, ErrorKind::Validation);
}

#[test]
fn parse_coordinate_pipeline_order() {
    // Shape first (parsing), then range (validation).
    let err = decay_tac_toe::parse_coordinate("no move here").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Parsing);

    let err = decay_tac_toe::parse_coordinate("D4").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let coord = decay_tac_toe::parse_coordinate("I choose C3.").unwrap();
    assert_eq!(coord, Coord::from_label("C3").unwrap());
}
