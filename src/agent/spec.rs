//! Agent specifications: what a seat at the board is built from.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{Agent, AgentError, BuiltinAgent};

/// An external agent program speaking the JSON worker protocol.
///
/// The program receives `{"board": ...}` on stdin and answers with a single
/// `{"move": ...}` or `{"error": ...}` line on stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct AgentCommand {
    /// Executable name or path.
    pub program: String,
    /// Arguments passed to the executable.
    #[serde(default)]
    pub args: Vec<String>,
}

impl AgentCommand {
    /// Command that runs a built-in agent through this executable's
    /// `agent-worker` subcommand.
    #[instrument]
    pub fn worker(builtin: BuiltinAgent) -> Result<Self, AgentError> {
        let exe = std::env::current_exe()
            .map_err(|e| AgentError::new(format!("Failed to get current executable path: {}", e)))?;
        Ok(Self::worker_at(&exe, builtin))
    }

    /// Like [`AgentCommand::worker`], for an explicit executable path.
    pub fn worker_at(exe: &Path, builtin: BuiltinAgent) -> Self {
        Self::new(
            exe.display().to_string(),
            vec!["agent-worker".to_string(), builtin.to_string()],
        )
    }

    /// Locates the executable, either as a path or on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] if the program is empty or cannot be found.
    #[instrument(skip(self), fields(program = %self.program))]
    pub fn resolve(&self) -> Result<PathBuf, AgentError> {
        if self.program.trim().is_empty() {
            return Err(AgentError::new("Agent command is empty"));
        }

        let direct = Path::new(&self.program);
        if direct.components().count() > 1 {
            return if direct.is_file() {
                Ok(direct.to_path_buf())
            } else {
                Err(AgentError::new(format!(
                    "Agent program not found: {}",
                    direct.display()
                )))
            };
        }

        let search_path = std::env::var_os("PATH").unwrap_or_default();
        std::env::split_paths(&search_path)
            .map(|dir| dir.join(&self.program))
            .find(|candidate| candidate.is_file())
            .inspect(|found| debug!(path = %found.display(), "Resolved agent program"))
            .ok_or_else(|| {
                AgentError::new(format!("Agent program not found on PATH: {}", self.program))
            })
    }
}

impl std::fmt::Display for AgentCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Where a seat's agent comes from.
pub enum AgentSpec {
    /// External program, run under process isolation.
    Command(AgentCommand),
    /// Built-in agent, run in-process.
    Builtin(BuiltinAgent),
    /// Caller-supplied agent, run in-process.
    Custom(Box<dyn Agent>),
}

impl AgentSpec {
    /// Short label used in logs and reports.
    pub fn label(&self) -> String {
        match self {
            AgentSpec::Command(command) => command.to_string(),
            AgentSpec::Builtin(builtin) => builtin.to_string(),
            AgentSpec::Custom(agent) => agent.name().to_string(),
        }
    }

    /// Replaces a built-in spec with a worker command so it runs isolated.
    ///
    /// Other specs are returned unchanged.
    #[instrument(skip(self), fields(spec = %self.label()))]
    pub fn isolated(self) -> Result<Self, AgentError> {
        match self {
            AgentSpec::Builtin(builtin) => Ok(AgentSpec::Command(AgentCommand::worker(builtin)?)),
            other => Ok(other),
        }
    }
}

impl std::fmt::Debug for AgentSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentSpec::Command(command) => f.debug_tuple("Command").field(command).finish(),
            AgentSpec::Builtin(builtin) => f.debug_tuple("Builtin").field(builtin).finish(),
            AgentSpec::Custom(agent) => f.debug_tuple("Custom").field(&agent.name()).finish(),
        }
    }
}

impl From<AgentCommand> for AgentSpec {
    fn from(command: AgentCommand) -> Self {
        AgentSpec::Command(command)
    }
}

impl From<BuiltinAgent> for AgentSpec {
    fn from(builtin: BuiltinAgent) -> Self {
        AgentSpec::Builtin(builtin)
    }
}

impl FromStr for AgentSpec {
    type Err = AgentError;

    /// Parses `cmd:<program> [args...]`, `builtin:<name>`, or a bare built-in name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(command) = s.strip_prefix("cmd:") {
            let mut parts = command.split_whitespace().map(str::to_string);
            let program = parts
                .next()
                .ok_or_else(|| AgentError::new("Agent command is empty"))?;
            return Ok(AgentSpec::Command(AgentCommand::new(program, parts.collect())));
        }

        let name = s.strip_prefix("builtin:").unwrap_or(s);
        BuiltinAgent::from_str(name)
            .map(AgentSpec::Builtin)
            .map_err(|_| AgentError::new(format!("Unknown agent: {}", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_builtin() {
        assert!(matches!(
            "random".parse::<AgentSpec>(),
            Ok(AgentSpec::Builtin(BuiltinAgent::Random))
        ));
        assert!(matches!(
            "builtin:greedy".parse::<AgentSpec>(),
            Ok(AgentSpec::Builtin(BuiltinAgent::Greedy))
        ));
        assert!("builtin:alphazero".parse::<AgentSpec>().is_err());
    }

    #[test]
    fn test_parse_command() {
        let spec: AgentSpec = "cmd:python3 agent.py --fast".parse().unwrap();
        match spec {
            AgentSpec::Command(command) => {
                assert_eq!(command.program, "python3");
                assert_eq!(command.args, ["agent.py", "--fast"]);
                assert_eq!(command.to_string(), "python3 agent.py --fast");
            }
            other => panic!("expected command, got {:?}", other),
        }
        assert!("cmd:   ".parse::<AgentSpec>().is_err());
    }

    #[test]
    fn test_resolve_missing_program() {
        let command = AgentCommand::new("./definitely/not/here".to_string(), Vec::new());
        assert!(command.resolve().is_err());
        let command = AgentCommand::new("no-such-agent-binary-xyz".to_string(), Vec::new());
        assert!(command.resolve().is_err());
        let command = AgentCommand::new(String::new(), Vec::new());
        assert!(command.resolve().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_on_path() {
        let command = AgentCommand::new("sh".to_string(), Vec::new());
        assert!(command.resolve().is_ok());
    }

    #[test]
    fn test_worker_command_shape() {
        let command = AgentCommand::worker_at(Path::new("/opt/pawn_arena"), BuiltinAgent::First);
        assert_eq!(command.program, "/opt/pawn_arena");
        assert_eq!(command.args, ["agent-worker", "first"]);
    }
}
