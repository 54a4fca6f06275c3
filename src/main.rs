//! Pawn Arena - Unified CLI
//!
//! Plays matches, tests single moves, serves built-in agents to the process
//! sandbox and solves the search puzzles.

#![warn(missing_docs)]

mod cli;

use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, Puzzle};
use pawn_arena::{
    AgentSpec, Board, BuiltinAgent, MatchOutcome, MoveTester, ProcessSandbox, Referee,
    RefereeConfig, serve_move,
};
use pawn_board::print_state;
use search_puzzles::{mnc_graph_search, mnc_tree_search, mnc_tree_search_bounded, pitcher_search};
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_BLACK: &str = "greedy";
const DEFAULT_WHITE: &str = "random";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,pawn_arena=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            black,
            white,
            board,
        } => run_play(cli.config.as_deref(), black, white, board.as_deref()).await,
        Command::TestMove { agent, board } => {
            run_test_move(cli.config.as_deref(), &agent, board.as_deref()).await
        }
        Command::AgentWorker { builtin } => run_agent_worker(builtin),
        Command::Solve { puzzle } => run_solve(puzzle),
    }
}

/// Reads a JSON board file, or returns the initial board.
fn load_board(path: Option<&Path>) -> Result<Board> {
    let Some(path) = path else {
        return Ok(Board::initial());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read board file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse board file {}", path.display()))
}

/// Play a full match
#[instrument(skip_all)]
async fn run_play(
    config_path: Option<&Path>,
    black: Option<String>,
    white: Option<String>,
    board: Option<&Path>,
) -> Result<ExitCode> {
    let config = RefereeConfig::load(config_path)?;

    let black = black
        .or_else(|| config.black().clone())
        .unwrap_or_else(|| DEFAULT_BLACK.to_string());
    let white = white
        .or_else(|| config.white().clone())
        .unwrap_or_else(|| DEFAULT_WHITE.to_string());
    info!(black = %black, white = %white, "Seating agents");

    let black: AgentSpec = black.parse()?;
    let black = black.isolated()?;
    let white: AgentSpec = white.parse()?;
    let board = load_board(board)?;

    print_state(&board);
    let outcome = Referee::new(config).play(black, white, board).await?;

    match &outcome {
        MatchOutcome::Finished(report) => {
            for (ply, record) in report.history().iter().enumerate() {
                let note = record
                    .forced
                    .as_deref()
                    .map(|reason| format!("  [fallback: {}]", reason))
                    .unwrap_or_default();
                println!("{:>3}. {:<5} {}{}", ply + 1, record.side, record.mv, note);
            }
            print_state(report.board());
            println!("{}", outcome);
            Ok(ExitCode::SUCCESS)
        }
        MatchOutcome::Aborted { .. } => {
            println!("{}", outcome);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Ask one agent for one move and grade it
#[instrument(skip(config_path, board), fields(agent = %agent))]
async fn run_test_move(
    config_path: Option<&Path>,
    agent: &str,
    board: Option<&Path>,
) -> Result<ExitCode> {
    let config = RefereeConfig::load(config_path)?;
    let tester = MoveTester::from(&config);
    let board = load_board(board)?;
    print_state(&board);

    let verdict = match agent.parse::<AgentSpec>()? {
        AgentSpec::Command(command) => {
            command.resolve()?;
            let started = Instant::now();
            let outcome = ProcessSandbox::new(*tester.timeout())
                .request_move(&command, &board)
                .await;
            tester.grade(&board, outcome, started.elapsed())
        }
        AgentSpec::Builtin(builtin) => tester.test_move(&board, builtin.build()).await,
        AgentSpec::Custom(custom) => tester.test_move(&board, custom).await,
    };

    println!("{}", verdict);
    Ok(if verdict.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Serve one move request on stdin/stdout
fn run_agent_worker(builtin: BuiltinAgent) -> Result<ExitCode> {
    debug!(agent = %builtin, "Agent worker started");
    let produced = serve_move(builtin, std::io::stdin().lock(), std::io::stdout().lock())?;
    Ok(if produced {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Solve a search puzzle and print the plan
fn run_solve(puzzle: Puzzle) -> Result<ExitCode> {
    let plan: Option<Vec<String>> = match puzzle {
        Puzzle::Mnc {
            graph,
            max_depth,
            missionaries,
            cannibals,
        } => {
            let plan = match (graph, max_depth) {
                (true, _) => mnc_graph_search(missionaries, cannibals),
                (false, Some(depth)) => mnc_tree_search_bounded(missionaries, cannibals, depth),
                (false, None) => mnc_tree_search(missionaries, cannibals),
            };
            plan.map(|steps| steps.iter().map(ToString::to_string).collect())
        }
        Puzzle::Pitcher { p1, p2, p3, amount } => pitcher_search(p1, p2, p3, amount)
            .map(|steps| steps.iter().map(ToString::to_string).collect()),
    };

    match plan {
        Some(steps) => {
            println!("[{}]", steps.join(", "));
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("No solution");
            Ok(ExitCode::FAILURE)
        }
    }
}
