//! Agent trait and implementations.

mod builtin;
mod error;
mod spec;

pub use builtin::{BuiltinAgent, FirstMoveAgent, GreedyAgent, RandomAgent};
pub use error::AgentError;
pub use spec::{AgentCommand, AgentSpec};

use pawn_board::{Board, Move};

/// Trait for agents that can pick a move.
///
/// The board is always shown from the agent's own perspective: it plays the
/// Black pawns and moves towards higher rows, whichever side it really is.
/// Agents are untrusted; the referee tolerates errors, panics and hangs.
pub trait Agent: Send {
    /// Chooses the next move on `board`.
    fn make_move(&mut self, board: &Board) -> Result<Move, AgentError>;

    /// Returns the agent's display name.
    fn name(&self) -> &str;
}
