//! Missionaries and cannibals.
//!
//! Everyone starts on the left bank with the boat. The boat carries one or
//! two people per crossing. On either bank, cannibals may never outnumber
//! missionaries while any missionary is present.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::frontier::{Problem, SearchMode, breadth_first};

/// One crossing: how many of each group ride the boat.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new, derive_more::Display,
)]
#[display("({}, {})", missionaries, cannibals)]
pub struct Crossing {
    /// Missionaries on the boat.
    pub missionaries: u32,
    /// Cannibals on the boat.
    pub cannibals: u32,
}

impl From<(u32, u32)> for Crossing {
    fn from((missionaries, cannibals): (u32, u32)) -> Self {
        Self::new(missionaries, cannibals)
    }
}

/// Boat loads in the order they are tried.
const LOADS: [Crossing; 5] = [
    Crossing { missionaries: 2, cannibals: 0 },
    Crossing { missionaries: 1, cannibals: 0 },
    Crossing { missionaries: 1, cannibals: 1 },
    Crossing { missionaries: 0, cannibals: 1 },
    Crossing { missionaries: 0, cannibals: 2 },
];

/// River bank the boat is moored at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bank {
    /// Starting bank.
    Left,
    /// Destination bank.
    Right,
}

/// Who is on the left bank and where the boat is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RiverState {
    /// Missionaries on the left bank.
    pub missionaries: u32,
    /// Cannibals on the left bank.
    pub cannibals: u32,
    /// Current boat position.
    pub boat: Bank,
}

struct RiverCrossing {
    missionaries: u32,
    cannibals: u32,
}

fn bank_is_safe(missionaries: u32, cannibals: u32) -> bool {
    missionaries == 0 || missionaries >= cannibals
}

impl Problem for RiverCrossing {
    type State = RiverState;
    type Action = Crossing;

    fn initial(&self) -> RiverState {
        RiverState {
            missionaries: self.missionaries,
            cannibals: self.cannibals,
            boat: Bank::Left,
        }
    }

    fn is_goal(&self, state: &RiverState) -> bool {
        state.missionaries == 0 && state.cannibals == 0 && state.boat == Bank::Right
    }

    fn successors(&self, state: &RiverState) -> Vec<(Crossing, RiverState)> {
        LOADS
            .iter()
            .filter_map(|&load| {
                let (m, c, boat) = match state.boat {
                    Bank::Left => (
                        state.missionaries.checked_sub(load.missionaries)?,
                        state.cannibals.checked_sub(load.cannibals)?,
                        Bank::Right,
                    ),
                    Bank::Right => (
                        state.missionaries + load.missionaries,
                        state.cannibals + load.cannibals,
                        Bank::Left,
                    ),
                };
                if m > self.missionaries || c > self.cannibals {
                    return None;
                }
                let safe = bank_is_safe(m, c)
                    && bank_is_safe(self.missionaries - m, self.cannibals - c);
                safe.then_some((load, RiverState { missionaries: m, cannibals: c, boat }))
            })
            .collect()
    }
}

/// Solves the puzzle with breadth-first tree search (no cycle detection).
///
/// Returns the crossings from start to goal, or `None` if unsolvable.
/// Because states are revisited, an unsolvable instance never terminates;
/// use [`mnc_tree_search_bounded`] or [`mnc_graph_search`] for those.
///
/// ```
/// use search_puzzles::{Crossing, mnc_tree_search};
///
/// let plan = mnc_tree_search(2, 1).unwrap();
/// assert_eq!(plan, [(2, 0), (1, 0), (1, 1)].map(Crossing::from));
/// ```
#[instrument]
pub fn mnc_tree_search(missionaries: u32, cannibals: u32) -> Option<Vec<Crossing>> {
    solve(missionaries, cannibals, SearchMode::Tree, None)
}

/// Tree search that gives up after `max_depth` crossings.
#[instrument]
pub fn mnc_tree_search_bounded(
    missionaries: u32,
    cannibals: u32,
    max_depth: usize,
) -> Option<Vec<Crossing>> {
    solve(missionaries, cannibals, SearchMode::Tree, Some(max_depth))
}

/// Solves the puzzle with breadth-first graph search.
///
/// Revisited states are pruned, so unsolvable instances such as `(4, 4)`
/// return `None` promptly.
#[instrument]
pub fn mnc_graph_search(missionaries: u32, cannibals: u32) -> Option<Vec<Crossing>> {
    solve(missionaries, cannibals, SearchMode::Graph, None)
}

fn solve(
    missionaries: u32,
    cannibals: u32,
    mode: SearchMode,
    max_depth: Option<usize>,
) -> Option<Vec<Crossing>> {
    let problem = RiverCrossing {
        missionaries,
        cannibals,
    };
    let plan = breadth_first(&problem, mode, max_depth);
    info!(
        missionaries,
        cannibals,
        ?mode,
        crossings = plan.as_ref().map(Vec::len),
        "Missionaries and cannibals search finished"
    );
    plan
}
