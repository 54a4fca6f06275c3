//! Classic search puzzles solved with uninformed breadth-first search.
//!
//! - [`mnc_tree_search`] / [`mnc_graph_search`]: missionaries and cannibals.
//! - [`pitcher_search`]: measuring an exact amount with three pitchers.
//!
//! Every solver returns `None` when the puzzle has no solution.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod frontier;
mod missionaries;
mod pitchers;

pub use frontier::{Problem, SearchMode, breadth_first};
pub use missionaries::{
    Bank, Crossing, RiverState, mnc_graph_search, mnc_tree_search, mnc_tree_search_bounded,
};
pub use pitchers::{PitcherAction, pitcher_search};
