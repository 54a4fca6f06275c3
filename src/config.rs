//! Referee configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable naming the default config file.
pub const CONFIG_ENV_VAR: &str = "PAWN_ARENA_CONFIG";

/// Timeouts, caps and default seats for the referee.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_setters::Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct RefereeConfig {
    /// Deadline for one move during a match, in milliseconds.
    #[serde(default = "default_move_timeout_ms")]
    move_timeout_ms: u64,

    /// Hard deadline for the single-move harness, in milliseconds.
    #[serde(default = "default_test_timeout_ms")]
    test_timeout_ms: u64,

    /// Time a harness move may take and still pass, in milliseconds.
    #[serde(default = "default_test_budget_ms")]
    test_budget_ms: u64,

    /// Plies after which a match is abandoned.
    #[serde(default = "default_max_plies")]
    max_plies: usize,

    /// Default Black agent, in CLI agent syntax.
    #[serde(default)]
    #[setters(strip_option, into)]
    black: Option<String>,

    /// Default White agent, in CLI agent syntax.
    #[serde(default)]
    #[setters(strip_option, into)]
    white: Option<String>,
}

fn default_move_timeout_ms() -> u64 {
    3000
}

fn default_test_timeout_ms() -> u64 {
    3050
}

fn default_test_budget_ms() -> u64 {
    3000
}

fn default_max_plies() -> usize {
    200
}

impl Default for RefereeConfig {
    fn default() -> Self {
        Self {
            move_timeout_ms: default_move_timeout_ms(),
            test_timeout_ms: default_test_timeout_ms(),
            test_budget_ms: default_test_budget_ms(),
            max_plies: default_max_plies(),
            black: None,
            white: None,
        }
    }
}

impl RefereeConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(
            move_timeout_ms = config.move_timeout_ms,
            max_plies = config.max_plies,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads from `path` if given, else from `$PAWN_ARENA_CONFIG`, else defaults.
    #[instrument(skip(path))]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                debug!(var = CONFIG_ENV_VAR, "Using config from environment");
                Self::from_file(Path::new(&path))
            }
            None => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.move_timeout_ms == 0 || self.test_timeout_ms == 0 {
            return Err(ConfigError::new("Timeouts must be positive"));
        }
        if self.test_budget_ms > self.test_timeout_ms {
            return Err(ConfigError::new(format!(
                "test_budget_ms ({}) exceeds test_timeout_ms ({})",
                self.test_budget_ms, self.test_timeout_ms
            )));
        }
        if self.max_plies == 0 {
            return Err(ConfigError::new("max_plies must be positive"));
        }
        Ok(())
    }

    /// Per-move deadline during a match.
    pub fn move_timeout(&self) -> Duration {
        Duration::from_millis(self.move_timeout_ms)
    }

    /// Hard deadline for the single-move harness.
    pub fn test_timeout(&self) -> Duration {
        Duration::from_millis(self.test_timeout_ms)
    }

    /// Passing budget for the single-move harness.
    pub fn test_budget(&self) -> Duration {
        Duration::from_millis(self.test_budget_ms)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
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
