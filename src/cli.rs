//! Command-line interface for pawn_arena.

use clap::{Parser, Subcommand};
use pawn_arena::BuiltinAgent;
use std::path::PathBuf;

/// Pawn Arena - referee for sandboxed pawn-race agents
#[derive(Parser, Debug)]
#[command(name = "pawn_arena")]
#[command(about = "Referee and test bench for 6x6 pawn-race agents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (defaults to $PAWN_ARENA_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a full match. Black runs in its own process.
    Play {
        /// Black agent: builtin name, `builtin:<name>` or `cmd:<program> [args]`
        #[arg(long)]
        black: Option<String>,

        /// White agent, same syntax as --black
        #[arg(long)]
        white: Option<String>,

        /// Board file (JSON) to start from instead of the initial position
        #[arg(long)]
        board: Option<PathBuf>,
    },

    /// Ask an agent for one move and grade it
    TestMove {
        /// Agent to test, same syntax as `play --black`
        agent: String,

        /// Board file (JSON) seen from the agent's side
        #[arg(long)]
        board: Option<PathBuf>,
    },

    /// Serve one move request for a built-in agent over stdin/stdout
    #[command(hide = true)]
    AgentWorker {
        /// Built-in agent to run
        builtin: BuiltinAgent,
    },

    /// Solve one of the search puzzles
    Solve {
        /// Puzzle to solve
        #[command(subcommand)]
        puzzle: Puzzle,
    },
}

/// Search puzzles
#[derive(Subcommand, Debug)]
pub enum Puzzle {
    /// Missionaries and cannibals
    Mnc {
        /// Skip repeated states
        #[arg(long)]
        graph: bool,

        /// Give up below this depth (tree search only)
        #[arg(long)]
        max_depth: Option<usize>,

        /// Missionaries
        missionaries: u32,

        /// Cannibals
        cannibals: u32,
    },

    /// Three pitchers
    Pitcher {
        /// Capacity of pitcher 1
        p1: u32,
        /// Capacity of pitcher 2
        p2: u32,
        /// Capacity of pitcher 3
        p3: u32,
        /// Amount to measure
        amount: u32,
    },
}
