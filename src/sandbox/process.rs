//! Process isolation for external agents.

use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use pawn_board::Board;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use super::MoveOutcome;
use crate::agent::{AgentCommand, AgentError};
use crate::protocol::{MoveReply, MoveRequest, parse_reply};

/// Kills the agent and everything it started on drop, whatever path the
/// caller took out.
///
/// On unix the agent leads its own process group, so the whole group is
/// signalled.
struct ChildGuard {
    child: Child,
    group: Option<u32>,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        let group = child.id();
        Self { child, group }
    }

    /// Kills every process left in the agent's group.
    #[cfg(unix)]
    fn kill_group(&self) {
        use nix::errno::Errno;
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::Pid;

        let Some(pgid) = self.group.and_then(|id| i32::try_from(id).ok()) else {
            return;
        };
        match killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
            Ok(()) => debug!(pgid, "Killed agent process group"),
            // group already empty
            Err(Errno::ESRCH) => {}
            Err(e) => warn!(pgid, error = %e, "Failed to kill agent process group"),
        }
    }

    #[cfg(not(unix))]
    fn kill_group(&self) {}
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        self.kill_group();
        // exited children report an error here, which is fine
        if self.child.start_kill().is_ok() {
            debug!(pid = ?self.child.id(), "Killed agent process");
        }
    }
}

/// Runs an [`AgentCommand`] in a child process with a hard deadline.
#[derive(Debug, Clone, Copy, derive_getters::Getters)]
pub struct ProcessSandbox {
    timeout: Duration,
}

impl Default for ProcessSandbox {
    fn default() -> Self {
        Self::new(Duration::from_secs(3))
    }
}

impl ProcessSandbox {
    /// Creates a sandbox with the given per-move deadline.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Asks the agent for a move on `board`.
    ///
    /// Never fails: spawn errors, crashes and bad replies become
    /// [`MoveOutcome::Failed`], and a missed deadline becomes
    /// [`MoveOutcome::TimedOut`]. The child and any processes it started are
    /// killed before this returns.
    #[instrument(skip(self, board), fields(agent = %command, timeout_ms = self.timeout.as_millis()))]
    pub async fn request_move(&self, command: &AgentCommand, board: &Board) -> MoveOutcome {
        let started = Instant::now();
        let outcome = match timeout(self.timeout, exchange(command, board)).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => MoveOutcome::Failed(e.message),
            Err(_) => MoveOutcome::TimedOut,
        };

        let elapsed_ms = started.elapsed().as_millis();
        match &outcome {
            MoveOutcome::Produced(mv) => debug!(mv = %mv, elapsed_ms, "Agent process answered"),
            MoveOutcome::TimedOut => warn!(elapsed_ms, "Agent process timed out"),
            MoveOutcome::Failed(reason) => warn!(reason = %reason, elapsed_ms, "Agent process failed"),
        }
        outcome
    }
}

/// Spawns the agent, sends the request and collects the reply.
async fn exchange(command: &AgentCommand, board: &Board) -> Result<MoveOutcome, AgentError> {
    let request = serde_json::to_string(&MoveRequest {
        board: board.clone(),
    })
    .map_err(|e| AgentError::new(format!("Failed to encode move request: {}", e)))?;

    let mut process = std::process::Command::new(&command.program);
    process
        .args(&command.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
    #[cfg(unix)]
    std::os::unix::process::CommandExt::process_group(&mut process, 0);

    let child = Command::from(process)
        .spawn()
        .map_err(|e| AgentError::new(format!("Failed to spawn {}: {}", command.program, e)))?;
    let mut guard = ChildGuard::new(child);
    info!(pid = ?guard.child.id(), "Spawned agent process");

    if let Some(mut stdin) = guard.child.stdin.take() {
        // agents that never read stdin may close it early
        if let Err(e) = stdin.write_all(request.as_bytes()).await {
            debug!(error = %e, "Agent did not accept the full request");
        }
    }

    let mut stdout = guard
        .child
        .stdout
        .take()
        .ok_or_else(|| AgentError::new("Agent stdout was not captured"))?;

    // Read while waiting so a chatty agent never blocks on a full pipe. Once
    // the agent exits, its leftover children are killed so they cannot hold
    // stdout open.
    let read = async {
        let mut output = String::new();
        stdout.read_to_string(&mut output).await.map(|_| output)
    };
    let finish = async {
        let status = guard.child.wait().await;
        guard.kill_group();
        status
    };
    let (output, status) = tokio::join!(read, finish);

    let status = status.map_err(|e| AgentError::new(format!("Failed to wait for agent: {}", e)))?;
    let output =
        output.map_err(|e| AgentError::new(format!("Failed to read agent output: {}", e)))?;

    Ok(interpret(status, &output))
}

fn interpret(status: ExitStatus, output: &str) -> MoveOutcome {
    match (status.success(), parse_reply(output)) {
        (true, Ok(MoveReply::Move(mv))) => MoveOutcome::Produced(mv),
        (_, Ok(MoveReply::Error(message))) => MoveOutcome::Failed(message),
        (true, Err(e)) => MoveOutcome::Failed(e.message),
        (false, _) => MoveOutcome::Failed(format!("Agent exited with {}", status)),
    }
}
