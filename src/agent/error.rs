//! Agent error type.

use derive_more::{Display, Error};
use tracing::instrument;

/// Error raised by an agent or while constructing one.
#[derive(Debug, Clone, Display, Error)]
#[display("Agent error: {} at {}:{}", message, file, line)]
pub struct AgentError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl AgentError {
    /// Creates a new agent error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<pawn_board::BoardError> for AgentError {
    #[track_caller]
    fn from(err: pawn_board::BoardError) -> Self {
        Self::new(err.to_string())
    }
}
