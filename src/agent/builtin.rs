//! Built-in agents, selectable by name.

use pawn_board::{Board, Cell, Move, ROWS};
use rand::seq::SliceRandom;
use rand::thread_rng;
use tracing::{debug, instrument};

use super::{Agent, AgentError};

/// Names of the agents shipped with the referee.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinAgent {
    /// Always plays the referee's own fallback move.
    First,
    /// Plays a uniformly random legal move.
    Random,
    /// Wins if it can, captures if it can, otherwise pushes its lead pawn.
    Greedy,
}

impl BuiltinAgent {
    /// Constructs the agent.
    #[instrument]
    pub fn build(self) -> Box<dyn Agent> {
        match self {
            BuiltinAgent::First => Box::new(FirstMoveAgent::new("first")),
            BuiltinAgent::Random => Box::new(RandomAgent::new("random")),
            BuiltinAgent::Greedy => Box::new(GreedyAgent::new("greedy")),
        }
    }
}

/// Agent that always picks the first legal move.
///
/// Deterministic, which makes it useful in tests.
pub struct FirstMoveAgent {
    name: String,
}

impl FirstMoveAgent {
    /// Creates a new first-move agent.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Agent for FirstMoveAgent {
    fn make_move(&mut self, board: &Board) -> Result<Move, AgentError> {
        Ok(board.first_valid_move()?)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Agent that picks a random legal move.
pub struct RandomAgent {
    name: String,
}

impl RandomAgent {
    /// Creates a new random agent.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Agent for RandomAgent {
    fn make_move(&mut self, board: &Board) -> Result<Move, AgentError> {
        board
            .valid_moves()
            .choose(&mut thread_rng())
            .copied()
            .ok_or_else(|| AgentError::new("No legal moves to choose from"))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// One-ply greedy agent.
pub struct GreedyAgent {
    name: String,
}

impl GreedyAgent {
    /// Creates a new greedy agent.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn score(board: &Board, mv: Move) -> i32 {
        let after = board.with_move(mv);
        if after.is_game_over() {
            return i32::MAX;
        }
        let capture = i32::from(board.get(mv.dst) == Some(Cell::WhitePawn));
        capture * ROWS as i32 + mv.dst.row
    }
}

impl Agent for GreedyAgent {
    fn make_move(&mut self, board: &Board) -> Result<Move, AgentError> {
        let moves = board.valid_moves();
        // max_by_key keeps the last maximum; reverse so ties go to the earliest move
        let best = moves
            .iter()
            .rev()
            .max_by_key(|mv| Self::score(board, **mv))
            .copied()
            .ok_or_else(|| AgentError::new("No legal moves to choose from"))?;
        debug!(agent = %self.name, mv = %best, "Greedy agent chose move");
        Ok(best)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
