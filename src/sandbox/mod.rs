//! Running untrusted agents with a deadline.
//!
//! Two sandboxes share one result type:
//!
//! - [`ProcessSandbox`] runs an external program in its own process and kills
//!   it when the deadline passes.
//! - [`ThreadSandbox`] runs an in-process agent on a detached thread. A
//!   runaway agent cannot be stopped; it is asked again once it finishes.

mod process;
mod quiet;
mod thread;

pub use process::ProcessSandbox;
pub use quiet::QuietGuard;
pub use thread::{AgentState, PendingAgent, ThreadSandbox};

use pawn_board::Move;

/// Result of asking an agent for one move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveOutcome {
    /// The agent answered with a move. It has not been validated.
    #[display("produced {}", _0)]
    Produced(Move),
    /// The agent did not answer before the deadline.
    #[display("timed out")]
    TimedOut,
    /// The agent crashed, panicked, errored or answered with garbage.
    #[display("failed: {}", _0)]
    Failed(String),
}
