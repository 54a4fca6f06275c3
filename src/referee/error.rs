//! Referee errors.

use pawn_board::{Board, Side};

/// Conditions that stop a match without a result.
///
/// Agent misbehaviour never ends up here: bad moves, crashes and timeouts are
/// replaced by a fallback move and the match continues.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RefereeError {
    /// The side to move had no legal move on a board that is not finished.
    #[display("{} has no legal move after {} plies on an unfinished board", side, plies)]
    NoFallback {
        /// Side to move.
        side: Side,
        /// Plies played so far.
        plies: usize,
        /// Board as seen by the side to move.
        board: Board,
    },
    /// The configured ply cap was reached.
    #[display("Match exceeded {} plies", limit)]
    PlyLimit {
        /// Configured cap.
        limit: usize,
    },
}
