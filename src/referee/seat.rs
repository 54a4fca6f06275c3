//! A prepared agent sitting at the board.

use pawn_board::Board;
use tracing::{debug, instrument};

use crate::agent::{AgentCommand, AgentError, AgentSpec};
use crate::sandbox::{AgentState, MoveOutcome, ProcessSandbox, ThreadSandbox};

pub(crate) enum Seat {
    /// External program, spawned fresh for every move.
    Process { command: AgentCommand },
    /// In-process agent, possibly still busy with a move it was too late for.
    InProcess { label: String, state: AgentState },
}

impl Seat {
    /// Builds the seat, checking that a command agent can be started.
    #[instrument(skip(spec), fields(spec = %spec.label()))]
    pub(crate) fn prepare(spec: AgentSpec) -> Result<Self, AgentError> {
        match spec {
            AgentSpec::Command(command) => {
                let path = command.resolve()?;
                debug!(path = %path.display(), "Command agent ready");
                Ok(Seat::Process { command })
            }
            AgentSpec::Builtin(builtin) => Ok(Seat::InProcess {
                label: builtin.to_string(),
                state: AgentState::Idle(builtin.build()),
            }),
            AgentSpec::Custom(agent) => Ok(Seat::InProcess {
                label: agent.name().to_string(),
                state: AgentState::Idle(agent),
            }),
        }
    }

    pub(crate) fn label(&self) -> String {
        match self {
            Seat::Process { command } => command.to_string(),
            Seat::InProcess { label, .. } => label.clone(),
        }
    }

    pub(crate) async fn request_move(
        &mut self,
        board: &Board,
        process: &ProcessSandbox,
        thread: &ThreadSandbox,
    ) -> MoveOutcome {
        match self {
            Seat::Process { command } => process.request_move(command, board).await,
            Seat::InProcess { label, state } => {
                match std::mem::replace(state, AgentState::Lost).reclaim() {
                    AgentState::Idle(agent) => {
                        let (next, outcome) = thread.request_move(agent, board).await;
                        *state = next;
                        outcome
                    }
                    AgentState::Busy(pending) => {
                        debug!(agent = %label, "Agent still busy with an earlier move");
                        *state = AgentState::Busy(pending);
                        MoveOutcome::Failed("Agent is still busy with an earlier move".to_string())
                    }
                    AgentState::Lost => {
                        MoveOutcome::Failed("Agent thread ended without answering".to_string())
                    }
                }
            }
        }
    }
}
