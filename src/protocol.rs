//! JSON protocol between the referee and agent processes.
//!
//! The referee writes one [`MoveRequest`] to the agent's stdin and closes it.
//! The agent answers with one [`MoveReply`] line on stdout. Only the last
//! non-empty stdout line is read, so stray prints earlier on are harmless.
//!
//! ```text
//! -> {"board":[["B","B",...],...]}
//! <- {"move":{"src":[1,0],"dst":[2,0]}}
//! <- {"error":"no idea"}
//! ```

use std::io::{BufReader, Read, Write};

use pawn_board::{Board, Move};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::agent::{AgentError, BuiltinAgent};

/// Request sent to an agent process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Board from the agent's perspective.
    pub board: Board,
}

/// Reply sent back by an agent process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveReply {
    /// The chosen move.
    Move(Move),
    /// The agent could not choose a move.
    Error(String),
}

/// Extracts the reply from an agent's stdout.
///
/// # Errors
///
/// Returns [`AgentError`] if there is no output or the last line is not a reply.
#[instrument(skip(output), fields(bytes = output.len()))]
pub fn parse_reply(output: &str) -> Result<MoveReply, AgentError> {
    let line = output
        .lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .ok_or_else(|| AgentError::new("Agent produced no output"))?;

    serde_json::from_str(line)
        .map_err(|e| AgentError::new(format!("Unreadable agent reply {:?}: {}", line, e)))
}

/// Serves a single move request for a built-in agent.
///
/// Reads the request from `input`, writes the reply to `output`, and returns
/// `Ok(true)` if the agent produced a move.
///
/// # Errors
///
/// Returns [`AgentError`] only for protocol failures (unreadable request,
/// closed output). Agent failures are reported in-band as
/// [`MoveReply::Error`].
#[instrument(skip(input, output))]
pub fn serve_move(
    builtin: BuiltinAgent,
    input: impl Read,
    mut output: impl Write,
) -> Result<bool, AgentError> {
    let mut request = String::new();
    BufReader::new(input)
        .read_to_string(&mut request)
        .map_err(|e| AgentError::new(format!("Failed to read move request: {}", e)))?;
    let request: MoveRequest = serde_json::from_str(&request)
        .map_err(|e| AgentError::new(format!("Invalid move request: {}", e)))?;

    let mut agent = builtin.build();
    let reply = match agent.make_move(&request.board) {
        Ok(mv) => {
            debug!(agent = %builtin, mv = %mv, "Worker agent chose move");
            MoveReply::Move(mv)
        }
        Err(e) => {
            warn!(agent = %builtin, error = %e, "Worker agent failed");
            MoveReply::Error(e.message)
        }
    };

    let produced = matches!(reply, MoveReply::Move(_));
    let line = serde_json::to_string(&reply)
        .map_err(|e| AgentError::new(format!("Failed to encode reply: {}", e)))?;
    writeln!(output, "{}", line)
        .and_then(|()| output.flush())
        .map_err(|e| AgentError::new(format!("Failed to write reply: {}", e)))?;
    Ok(produced)
}
