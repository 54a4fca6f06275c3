//! Pawn Arena - referee for sandboxed pawn-race matches
//!
//! Two agents race their pawns across a 6x6 board. The referee runs each
//! agent under a deadline, replaces anything illegal with a fallback move and
//! reports who won.
//!
//! # Architecture
//!
//! - **Agent**: the [`Agent`] trait, built-in agents and [`AgentSpec`] seats
//! - **Sandbox**: per-move isolation for external programs and in-process agents
//! - **Referee**: the match driver with perspective inversion
//! - **Harness**: grades a single move against a time budget
//! - **Protocol**: JSON exchange with external agent programs
//!
//! Board rules live in [`pawn_board`]; the puzzle solvers in `search_puzzles`.
//!
//! # Example
//!
//! ```no_run
//! use pawn_arena::{AgentSpec, BuiltinAgent, Referee, RefereeConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let referee = Referee::new(RefereeConfig::default());
//! let outcome = referee
//!     .play_from_start(
//!         AgentSpec::Builtin(BuiltinAgent::Greedy),
//!         AgentSpec::Builtin(BuiltinAgent::Random),
//!     )
//!     .await?;
//! println!("{}", outcome);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod agent;
mod config;
mod harness;
mod protocol;
mod referee;
mod sandbox;

// Crate-level exports - Agents
pub use agent::{
    Agent, AgentCommand, AgentError, AgentSpec, BuiltinAgent, FirstMoveAgent, GreedyAgent,
    RandomAgent,
};

// Crate-level exports - Configuration
pub use config::{CONFIG_ENV_VAR, ConfigError, RefereeConfig};

// Crate-level exports - Single-move harness
pub use harness::{MoveTester, MoveVerdict, Rejection};

// Crate-level exports - Worker protocol
pub use protocol::{MoveReply, MoveRequest, parse_reply, serve_move};

// Crate-level exports - Match driver
pub use referee::{MatchOutcome, MatchReport, PlyRecord, Referee, RefereeError};

// Crate-level exports - Sandboxes
pub use sandbox::{
    AgentState, MoveOutcome, PendingAgent, ProcessSandbox, QuietGuard, ThreadSandbox,
};

// Board model re-exports
pub use pawn_board::{Board, BoardError, Cell, Move, Position, Side};
