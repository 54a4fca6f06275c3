//! Single-move test harness.
//!
//! Asks an agent for exactly one move and grades it: legal and within the
//! time budget passes, anything else does not. Agent failures are reported,
//! never propagated.

use std::time::{Duration, Instant};

use pawn_board::{Board, Move};
use tracing::{info, instrument, warn};

use crate::agent::Agent;
use crate::config::RefereeConfig;
use crate::sandbox::{MoveOutcome, ThreadSandbox};

/// Why a produced move did not pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Rejection {
    /// The move is not legal on the given board.
    #[display("illegal move")]
    IllegalMove,
    /// The move took longer than the budget.
    #[display("over time budget")]
    OverBudget,
}

/// Grade for a single move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveVerdict {
    /// Legal move within budget.
    Passed {
        /// The move.
        mv: Move,
        /// Time the agent took.
        elapsed: Duration,
    },
    /// The agent produced a move that does not pass.
    Rejected {
        /// The move.
        mv: Move,
        /// Time the agent took.
        elapsed: Duration,
        /// What was wrong with it.
        rejection: Rejection,
    },
    /// The agent produced no move.
    Failed {
        /// Timeout, error or panic description.
        reason: String,
    },
}

impl MoveVerdict {
    /// True for [`MoveVerdict::Passed`].
    pub fn passed(&self) -> bool {
        matches!(self, MoveVerdict::Passed { .. })
    }
}

impl std::fmt::Display for MoveVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveVerdict::Passed { mv, elapsed } => {
                write!(f, "PASSED: {} in {:.3}s", mv, elapsed.as_secs_f64())
            }
            MoveVerdict::Rejected {
                mv,
                elapsed,
                rejection,
            } => write!(
                f,
                "REJECTED ({}): {} in {:.3}s",
                rejection,
                mv,
                elapsed.as_secs_f64()
            ),
            MoveVerdict::Failed { reason } => write!(f, "FAILED, reason: {}", reason),
        }
    }
}

/// Runs agents for one move under a deadline and a time budget.
#[derive(Debug, Clone, Copy, derive_getters::Getters)]
pub struct MoveTester {
    timeout: Duration,
    budget: Duration,
}

impl Default for MoveTester {
    fn default() -> Self {
        Self::new(Duration::from_millis(3050), Duration::from_millis(3000))
    }
}

impl From<&RefereeConfig> for MoveTester {
    fn from(config: &RefereeConfig) -> Self {
        Self::new(config.test_timeout(), config.test_budget())
    }
}

impl MoveTester {
    /// Creates a tester. `timeout` bounds the wait; `budget` bounds a pass.
    pub fn new(timeout: Duration, budget: Duration) -> Self {
        Self { timeout, budget }
    }

    /// Asks `agent` for one move on a copy of `board` and grades it.
    #[instrument(skip(self, board, agent), fields(agent = %agent.name()))]
    pub async fn test_move(&self, board: &Board, agent: Box<dyn Agent>) -> MoveVerdict {
        let started = Instant::now();
        let (_, outcome) = ThreadSandbox::new(self.timeout)
            .request_move(agent, board)
            .await;
        let elapsed = started.elapsed();
        let verdict = self.grade(board, outcome, elapsed);

        if verdict.passed() {
            info!(verdict = %verdict, "Move passed");
        } else {
            warn!(verdict = %verdict, "Move did not pass");
        }
        verdict
    }

    /// Grades an outcome measured at `elapsed`.
    pub fn grade(&self, board: &Board, outcome: MoveOutcome, elapsed: Duration) -> MoveVerdict {
        match outcome {
            MoveOutcome::Produced(mv) if !board.is_valid_move(mv.src, mv.dst) => {
                MoveVerdict::Rejected {
                    mv,
                    elapsed,
                    rejection: Rejection::IllegalMove,
                }
            }
            MoveOutcome::Produced(mv) if elapsed > self.budget => MoveVerdict::Rejected {
                mv,
                elapsed,
                rejection: Rejection::OverBudget,
            },
            MoveOutcome::Produced(mv) => MoveVerdict::Passed { mv, elapsed },
            MoveOutcome::TimedOut => MoveVerdict::Failed {
                reason: format!("no move within {:.2}s", self.timeout.as_secs_f64()),
            },
            MoveOutcome::Failed(reason) => MoveVerdict::Failed { reason },
        }
    }
}
