//! Match driver tests with in-process agents.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pawn_arena::{
    Agent, AgentCommand, AgentError, AgentSpec, Board, BuiltinAgent, FirstMoveAgent,
    MatchOutcome, MatchReport, Move, Referee, RefereeConfig, RefereeError, Side,
};

/// Always errors.
struct Stubborn;

impl Agent for Stubborn {
    fn make_move(&mut self, _board: &Board) -> Result<Move, AgentError> {
        Err(AgentError::new("I refuse"))
    }

    fn name(&self) -> &str {
        "stubborn"
    }
}

/// Always plays a move that is never legal.
struct Cheater;

impl Agent for Cheater {
    fn make_move(&mut self, _board: &Board) -> Result<Move, AgentError> {
        Ok(Move::from(((0, 0), (5, 5))))
    }

    fn name(&self) -> &str {
        "cheater"
    }
}

/// Sleeps past any reasonable deadline before answering.
struct Sleeper;

impl Agent for Sleeper {
    fn make_move(&mut self, board: &Board) -> Result<Move, AgentError> {
        std::thread::sleep(Duration::from_millis(300));
        Ok(board.first_valid_move()?)
    }

    fn name(&self) -> &str {
        "sleeper"
    }
}

/// Plays the first legal move after sleeping for the next scripted delay.
struct Scripted {
    name: String,
    delays_ms: Vec<u64>,
    calls: usize,
}

impl Scripted {
    fn new(name: &str, delays_ms: &[u64]) -> Self {
        Self {
            name: name.to_string(),
            delays_ms: delays_ms.to_vec(),
            calls: 0,
        }
    }
}

impl Agent for Scripted {
    fn make_move(&mut self, board: &Board) -> Result<Move, AgentError> {
        let delay = self.delays_ms.get(self.calls).copied().unwrap_or(0);
        self.calls += 1;
        std::thread::sleep(Duration::from_millis(delay));
        Ok(board.first_valid_move()?)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Plays the first legal move and records every board it is shown.
struct Recorder {
    seen: Arc<Mutex<Vec<Board>>>,
}

impl Agent for Recorder {
    fn make_move(&mut self, board: &Board) -> Result<Move, AgentError> {
        self.seen.lock().unwrap().push(board.clone());
        Ok(board.first_valid_move()?)
    }

    fn name(&self) -> &str {
        "recorder"
    }
}

fn referee() -> Referee {
    Referee::new(RefereeConfig::default().with_move_timeout_ms(1000))
}

fn finished(outcome: MatchOutcome) -> MatchReport {
    match outcome {
        MatchOutcome::Finished(report) => report,
        MatchOutcome::Aborted { reason } => panic!("match aborted: {reason}"),
    }
}

/// Replays a report's history, which is recorded in true board coordinates.
fn replay(history: &[pawn_arena::PlyRecord]) -> Board {
    let mut board = Board::initial();
    for ply in history {
        match ply.side {
            Side::Black => assert!(board.apply_move(ply.mv), "black {}", ply.mv),
            Side::White => {
                board.invert();
                assert!(board.apply_move(ply.mv.mirrored()), "white {}", ply.mv);
                board.invert();
            }
        }
    }
    board
}

#[tokio::test]
async fn test_builtin_match_finishes() {
    let report = finished(
        referee()
            .play_from_start(BuiltinAgent::Greedy.into(), BuiltinAgent::First.into())
            .await
            .unwrap(),
    );

    assert!(*report.plies() > 0);
    assert_eq!(*report.plies(), report.history().len());
    assert_eq!(report.board().winner(), Some(*report.winner()));
    assert_eq!(report.history().last().map(|ply| ply.side), Some(*report.winner()));
    assert_eq!(report.random_moves(Side::Black), 0);
    assert_eq!(report.random_moves(Side::White), 0);
    assert_eq!(&replay(report.history()), report.board());
    assert_eq!(report.primary_won(), *report.winner() == Side::Black);
}

#[tokio::test]
async fn test_sides_alternate_starting_with_black() {
    let report = finished(
        referee()
            .play_from_start(BuiltinAgent::Random.into(), BuiltinAgent::Random.into())
            .await
            .unwrap(),
    );
    for (ply, record) in report.history().iter().enumerate() {
        assert_eq!(record.side, Side::for_ply(ply));
    }
}

#[tokio::test]
async fn test_white_sees_inverted_board() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let white = Recorder { seen: seen.clone() };

    let report = finished(
        referee()
            .play_from_start(
                BuiltinAgent::First.into(),
                AgentSpec::Custom(Box::new(white)),
            )
            .await
            .unwrap(),
    );

    let seen = seen.lock().unwrap();
    let white_plies = report
        .history()
        .iter()
        .filter(|ply| ply.side == Side::White)
        .count();
    assert_eq!(seen.len(), white_plies);
    assert!(seen.iter().all(|board| !board.is_game_over()));
    let after_black_opening = Board::initial().with_move(Move::from(((1, 0), (2, 0))));
    assert_eq!(seen[0], after_black_opening.inverted());
    // white's first move, played as (1,0)->(2,0) on its own view, lands on row 3
    assert_eq!(report.history()[1].mv, Move::from(((4, 0), (3, 0))));
}

#[tokio::test]
async fn test_erroring_agent_gets_fallback_moves() {
    let report = finished(
        referee()
            .play_from_start(
                BuiltinAgent::First.into(),
                AgentSpec::Custom(Box::new(Stubborn)),
            )
            .await
            .unwrap(),
    );

    let white_plies: Vec<_> = report
        .history()
        .iter()
        .filter(|ply| ply.side == Side::White)
        .collect();
    assert!(!white_plies.is_empty());
    assert!(white_plies.iter().all(|ply| ply.forced.is_some()));
    assert_eq!(report.random_moves(Side::White), white_plies.len());
    assert_eq!(report.random_moves(Side::Black), 0);
    assert_eq!(&replay(report.history()), report.board());
}

#[tokio::test]
async fn test_illegal_moves_are_replaced() {
    let report = finished(
        referee()
            .play_from_start(AgentSpec::Custom(Box::new(Cheater)), BuiltinAgent::First.into())
            .await
            .unwrap(),
    );

    let first = &report.history()[0];
    assert_eq!(first.side, Side::Black);
    assert_eq!(first.mv, Move::from(((1, 0), (2, 0))));
    assert!(first.forced.as_deref().is_some_and(|reason| reason.contains("illegal")));
    assert_eq!(
        report.random_moves(Side::Black),
        report.history().iter().filter(|p| p.side == Side::Black).count()
    );
}

#[tokio::test]
async fn test_always_slow_agent_is_forced_every_turn() {
    let referee = Referee::new(RefereeConfig::default().with_move_timeout_ms(50));
    let report = finished(
        referee
            .play_from_start(
                BuiltinAgent::First.into(),
                AgentSpec::Custom(Box::new(Sleeper)),
            )
            .await
            .unwrap(),
    );

    let white: Vec<_> = report
        .history()
        .iter()
        .filter(|ply| ply.side == Side::White)
        .collect();
    assert_eq!(white[0].forced.as_deref(), Some("timed out"));
    assert!(white[1].forced.as_deref().is_some_and(|reason| reason.contains("still busy")));
    assert!(white.iter().all(|ply| ply.forced.is_some()));
}

#[tokio::test]
async fn test_timed_out_agent_plays_again_once_it_finishes() {
    let referee = Referee::new(RefereeConfig::default().with_move_timeout_ms(600));
    let black = Scripted::new("black", &[0, 450]);
    let white = Scripted::new("white", &[800]);
    let report = finished(
        referee
            .play_from_start(AgentSpec::Custom(Box::new(black)), AgentSpec::Custom(Box::new(white)))
            .await
            .unwrap(),
    );

    let white: Vec<_> = report
        .history()
        .iter()
        .filter(|ply| ply.side == Side::White)
        .collect();
    assert_eq!(white[0].forced.as_deref(), Some("timed out"));
    assert_eq!(white[1].forced, None);
    assert_eq!(report.random_moves(Side::White), 1);
    assert_eq!(report.random_moves(Side::Black), 0);
}

#[tokio::test]
async fn test_unstartable_agent_aborts_match() {
    let missing = || AgentSpec::Command(AgentCommand::new("./no/such/agent".to_string(), vec![]));

    let outcome = referee()
        .play_from_start(missing(), BuiltinAgent::First.into())
        .await
        .unwrap();
    match outcome {
        MatchOutcome::Aborted { reason } => {
            assert!(reason.starts_with("Black(./no/such/agent) failed to initialise"))
        }
        other => panic!("expected abort, got {other}"),
    }

    let outcome = referee()
        .play_from_start(BuiltinAgent::First.into(), missing())
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        MatchOutcome::Aborted { ref reason } if reason.starts_with("White(")
    ));

    // black is checked first
    let outcome = referee().play_from_start(missing(), missing()).await.unwrap();
    assert!(matches!(
        outcome,
        MatchOutcome::Aborted { ref reason } if reason.starts_with("Black(")
    ));
}

#[tokio::test]
async fn test_finished_board_plays_no_moves() {
    let board = Board::from_rows([
        "______", "______", "______", "_W____", "______", "B_____",
    ])
    .unwrap();
    let report = finished(
        referee()
            .play(BuiltinAgent::First.into(), BuiltinAgent::First.into(), board.clone())
            .await
            .unwrap(),
    );
    assert_eq!(*report.plies(), 0);
    assert_eq!(*report.winner(), Side::Black);
    assert_eq!(report.board(), &board);
}

#[tokio::test]
async fn test_ply_cap() {
    let referee = Referee::new(RefereeConfig::default().with_max_plies(3));
    let result = referee
        .play_from_start(
            AgentSpec::Custom(Box::new(FirstMoveAgent::new("a"))),
            AgentSpec::Custom(Box::new(FirstMoveAgent::new("b"))),
        )
        .await;
    assert_eq!(result, Err(RefereeError::PlyLimit { limit: 3 }));
}
