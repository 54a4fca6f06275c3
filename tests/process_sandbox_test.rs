//! Process isolation tests. Agents are small shell scripts or the built
//! binary's `agent-worker` subcommand.
#![cfg(unix)]

use std::path::Path;
use std::time::{Duration, Instant};

use pawn_arena::{
    AgentCommand, AgentSpec, Board, BuiltinAgent, MatchOutcome, Move, MoveOutcome,
    ProcessSandbox, Referee, RefereeConfig, Side,
};

fn shell(script: &str) -> AgentCommand {
    AgentCommand::new("sh".to_string(), vec!["-c".to_string(), script.to_string()])
}

fn worker(builtin: BuiltinAgent) -> AgentCommand {
    AgentCommand::worker_at(Path::new(env!("CARGO_BIN_EXE_pawn_arena")), builtin)
}

fn sandbox() -> ProcessSandbox {
    ProcessSandbox::new(Duration::from_secs(10))
}

#[tokio::test]
async fn test_valid_reply_is_produced() {
    let agent = shell(r#"cat > /dev/null; echo '{"move":{"src":[1,2],"dst":[2,3]}}'"#);
    let outcome = sandbox().request_move(&agent, &Board::initial()).await;
    assert_eq!(outcome, MoveOutcome::Produced(Move::from(((1, 2), (2, 3)))));
}

#[tokio::test]
async fn test_chatty_agent_last_line_wins() {
    let agent = shell(
        r#"cat > /dev/null; echo 'thinking hard'; echo '{"move":{"src":[1,0],"dst":[2,0]}}'"#,
    );
    let outcome = sandbox().request_move(&agent, &Board::initial()).await;
    assert_eq!(outcome, MoveOutcome::Produced(Move::from(((1, 0), (2, 0)))));
}

#[tokio::test]
async fn test_agent_ignoring_stdin_still_answers() {
    let agent = shell(r#"echo '{"move":{"src":[1,0],"dst":[2,1]}}'"#);
    let outcome = sandbox().request_move(&agent, &Board::initial()).await;
    assert_eq!(outcome, MoveOutcome::Produced(Move::from(((1, 0), (2, 1)))));
}

#[tokio::test]
async fn test_hung_agent_is_timed_out() {
    let agent = shell("sleep 30");
    let started = Instant::now();
    let outcome = ProcessSandbox::new(Duration::from_millis(200))
        .request_move(&agent, &Board::initial())
        .await;
    assert_eq!(outcome, MoveOutcome::TimedOut);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_error_reply_and_exit_code() {
    let agent = shell(r#"cat > /dev/null; echo '{"error":"no idea"}'; exit 1"#);
    let outcome = sandbox().request_move(&agent, &Board::initial()).await;
    assert_eq!(outcome, MoveOutcome::Failed("no idea".to_string()));

    let agent = shell("exit 3");
    let outcome = sandbox().request_move(&agent, &Board::initial()).await;
    assert!(matches!(outcome, MoveOutcome::Failed(reason) if reason.contains("exit")));
}

#[tokio::test]
async fn test_garbage_output_fails() {
    let agent = shell("echo '((1, 0), (2, 0))'");
    let outcome = sandbox().request_move(&agent, &Board::initial()).await;
    assert!(matches!(outcome, MoveOutcome::Failed(_)));
}

#[tokio::test]
async fn test_missing_program_fails() {
    let agent = AgentCommand::new("/no/such/agent/binary".to_string(), vec![]);
    let outcome = sandbox().request_move(&agent, &Board::initial()).await;
    assert!(matches!(outcome, MoveOutcome::Failed(_)));
}

#[tokio::test]
async fn test_builtin_worker_answers() {
    let outcome = sandbox()
        .request_move(&worker(BuiltinAgent::First), &Board::initial())
        .await;
    assert_eq!(outcome, MoveOutcome::Produced(Move::from(((1, 0), (2, 0)))));
}

#[tokio::test]
async fn test_builtin_worker_reports_failure() {
    let finished = Board::from_rows([
        "______", "______", "______", "______", "______", "B_____",
    ])
    .unwrap();
    let outcome = sandbox()
        .request_move(&worker(BuiltinAgent::Greedy), &finished)
        .await;
    assert!(matches!(outcome, MoveOutcome::Failed(_)));
}

#[tokio::test]
async fn test_match_with_isolated_black() {
    let referee = Referee::new(RefereeConfig::default().with_move_timeout_ms(10_000));
    let outcome = referee
        .play_from_start(
            AgentSpec::Command(worker(BuiltinAgent::First)),
            BuiltinAgent::Greedy.into(),
        )
        .await
        .unwrap();

    let report = match outcome {
        MatchOutcome::Finished(report) => report,
        MatchOutcome::Aborted { reason } => panic!("match aborted: {reason}"),
    };
    assert_eq!(report.random_moves(Side::Black), 0);
    assert_eq!(report.board().winner(), Some(*report.winner()));
}

/// True once `pid` has exited, zombie or reaped.
#[cfg(target_os = "linux")]
fn exited(pid: &str) -> bool {
    match std::fs::read_to_string(format!("/proc/{}/stat", pid.trim())) {
        Ok(stat) => stat
            .rsplit_once(')')
            .is_some_and(|(_, rest)| rest.trim_start().starts_with('Z')),
        Err(_) => true,
    }
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_timeout_kills_processes_the_agent_started() {
    let dir = tempfile::tempdir().unwrap();
    let pid_file = dir.path().join("helper.pid");
    let agent = shell(&format!(
        "sleep 30 & echo $! > {}; wait",
        pid_file.display()
    ));

    let outcome = ProcessSandbox::new(Duration::from_millis(300))
        .request_move(&agent, &Board::initial())
        .await;
    assert_eq!(outcome, MoveOutcome::TimedOut);

    let pid = std::fs::read_to_string(&pid_file).unwrap();
    let deadline = Instant::now() + Duration::from_secs(5);
    while !exited(&pid) && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(exited(&pid), "helper process {} outlived its agent", pid.trim());
}

#[tokio::test]
async fn test_reply_counts_even_if_a_helper_keeps_stdout_open() {
    let agent = shell(
        r#"cat > /dev/null; (sleep 30 &); echo '{"move":{"src":[1,0],"dst":[2,0]}}'"#,
    );
    let started = Instant::now();
    let outcome = ProcessSandbox::new(Duration::from_secs(5))
        .request_move(&agent, &Board::initial())
        .await;
    assert_eq!(outcome, MoveOutcome::Produced(Move::from(((1, 0), (2, 0)))));
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_match_survives_hung_isolated_black() {
    let timeout_ms = 150;
    let referee = Referee::new(RefereeConfig::default().with_move_timeout_ms(timeout_ms));
    let started = Instant::now();
    let outcome = referee
        .play_from_start(
            AgentSpec::Command(shell("sleep 30")),
            BuiltinAgent::First.into(),
        )
        .await
        .unwrap();
    let elapsed = started.elapsed();

    let report = match outcome {
        MatchOutcome::Finished(report) => report,
        MatchOutcome::Aborted { reason } => panic!("match aborted: {reason}"),
    };
    let black_plies = report
        .history()
        .iter()
        .filter(|ply| ply.side == Side::Black)
        .count();
    assert!(black_plies > 0);
    assert_eq!(report.random_moves(Side::Black), black_plies);
    assert!(
        report
            .history()
            .iter()
            .filter(|ply| ply.side == Side::Black)
            .all(|ply| ply.forced.as_deref() == Some("timed out"))
    );
    let budget = Duration::from_millis(timeout_ms * 3 * black_plies as u64) + Duration::from_secs(2);
    assert!(elapsed < budget, "match took {elapsed:?} for {black_plies} black plies");
}

#[tokio::test]
async fn test_match_survives_erroring_isolated_black() {
    let referee = Referee::new(RefereeConfig::default().with_move_timeout_ms(5000));
    let outcome = referee
        .play_from_start(
            AgentSpec::Command(shell(r#"cat > /dev/null; echo '{"error":"boom"}'; exit 1"#)),
            BuiltinAgent::First.into(),
        )
        .await
        .unwrap();

    let report = match outcome {
        MatchOutcome::Finished(report) => report,
        MatchOutcome::Aborted { reason } => panic!("match aborted: {reason}"),
    };
    let black: Vec<_> = report
        .history()
        .iter()
        .filter(|ply| ply.side == Side::Black)
        .collect();
    assert_eq!(black[0].forced.as_deref(), Some("failed: boom"));
    assert_eq!(report.random_moves(Side::Black), black.len());
    assert_eq!(report.random_moves(Side::White), 0);
}
