//! Deadline-bounded calls into in-process agents.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::{Duration, Instant};

use pawn_board::{Board, Move};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use super::{MoveOutcome, QuietGuard};
use crate::agent::{Agent, AgentError};

type AgentResult = (Box<dyn Agent>, std::thread::Result<Result<Move, AgentError>>);

/// Where an in-process agent is between calls.
pub enum AgentState {
    /// Ready to be asked for a move.
    Idle(Box<dyn Agent>),
    /// Still working on a move whose deadline has passed.
    Busy(PendingAgent),
    /// Gone for good: its thread never started or ended without answering.
    Lost,
}

impl AgentState {
    /// Takes the agent back from a finished stale call, if there is one.
    ///
    /// The stale answer is discarded.
    pub fn reclaim(self) -> Self {
        match self {
            AgentState::Busy(pending) => pending.reclaim(),
            other => other,
        }
    }

    /// True if the agent can be asked for a move right now.
    pub fn is_idle(&self) -> bool {
        matches!(self, AgentState::Idle(_))
    }
}

/// An agent that missed its deadline, with the channel its answer will arrive on.
pub struct PendingAgent {
    name: String,
    rx: oneshot::Receiver<AgentResult>,
}

impl PendingAgent {
    fn reclaim(mut self) -> AgentState {
        match self.rx.try_recv() {
            Ok((agent, _stale)) => {
                debug!(agent = %self.name, "Reclaimed agent after its late answer");
                AgentState::Idle(agent)
            }
            Err(TryRecvError::Empty) => AgentState::Busy(self),
            Err(TryRecvError::Closed) => {
                warn!(agent = %self.name, "Agent thread ended without answering");
                AgentState::Lost
            }
        }
    }
}

/// Runs an in-process [`Agent`] on its own thread with a deadline.
///
/// The agent is moved onto a fresh thread for each call and handed back when
/// it answers in time. An agent that misses the deadline comes back as
/// [`AgentState::Busy`] and can be reclaimed once its thread finishes.
#[derive(Debug, Clone, Copy, derive_getters::Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct ThreadSandbox {
    /// Deadline for one move.
    timeout: Duration,
    /// Silence stdout and stderr while the agent thinks.
    quiet: bool,
}

impl Default for ThreadSandbox {
    fn default() -> Self {
        Self::new(Duration::from_secs(3))
    }
}

impl ThreadSandbox {
    /// Creates a quiet sandbox with the given per-move deadline.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            quiet: true,
        }
    }

    /// Asks `agent` for a move on a copy of `board`.
    ///
    /// Returns where the agent is now alongside the outcome.
    #[instrument(skip(self, agent, board), fields(agent = %agent.name(), timeout_ms = self.timeout.as_millis()))]
    pub async fn request_move(
        &self,
        mut agent: Box<dyn Agent>,
        board: &Board,
    ) -> (AgentState, MoveOutcome) {
        let board = board.clone();
        let name = agent.name().to_string();
        let (tx, mut rx) = oneshot::channel::<AgentResult>();
        let started = Instant::now();

        let quiet = if self.quiet {
            QuietGuard::acquire()
        } else {
            QuietGuard::inert()
        };
        debug!(quiet = quiet.is_active(), "Calling agent");

        let spawned = std::thread::Builder::new()
            .name(format!("agent-{}", name))
            .spawn(move || {
                let result = catch_unwind(AssertUnwindSafe(|| agent.make_move(&board)));
                // receiver is gone once the seat is dropped
                let _ = tx.send((agent, result));
            });
        if let Err(e) = spawned {
            drop(quiet);
            warn!(error = %e, "Failed to start agent thread");
            return (
                AgentState::Lost,
                MoveOutcome::Failed(format!("Failed to start agent thread: {}", e)),
            );
        }

        let received = timeout(self.timeout, &mut rx).await;
        drop(quiet);
        let elapsed_ms = started.elapsed().as_millis();

        match received {
            Ok(Ok((agent, Ok(Ok(mv))))) => {
                debug!(mv = %mv, elapsed_ms, "Agent answered");
                (AgentState::Idle(agent), MoveOutcome::Produced(mv))
            }
            Ok(Ok((agent, Ok(Err(e))))) => {
                warn!(error = %e, elapsed_ms, "Agent returned an error");
                (AgentState::Idle(agent), MoveOutcome::Failed(e.message))
            }
            Ok(Ok((agent, Err(payload)))) => {
                let reason = panic_message(payload.as_ref());
                warn!(reason = %reason, elapsed_ms, "Agent panicked");
                (
                    AgentState::Idle(agent),
                    MoveOutcome::Failed(format!("Agent panicked: {}", reason)),
                )
            }
            Ok(Err(_)) => {
                warn!(elapsed_ms, "Agent thread ended without answering");
                (
                    AgentState::Lost,
                    MoveOutcome::Failed("Agent thread ended without answering".to_string()),
                )
            }
            Err(_) => {
                warn!(elapsed_ms, "Agent timed out, still running");
                (
                    AgentState::Busy(PendingAgent { name, rx }),
                    MoveOutcome::TimedOut,
                )
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
