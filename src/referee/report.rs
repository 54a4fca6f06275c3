//! Match results.

use pawn_board::{Board, Move, Side};
use serde::{Deserialize, Serialize};

/// One ply of a finished match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct PlyRecord {
    /// Side that moved.
    pub side: Side,
    /// Move played, in true board coordinates.
    pub mv: Move,
    /// Why the referee substituted a fallback move, if it did.
    pub forced: Option<String>,
}

/// Summary of a completed match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct MatchReport {
    winner: Side,
    plies: usize,
    black_random_moves: usize,
    white_random_moves: usize,
    history: Vec<PlyRecord>,
    board: Board,
}

impl MatchReport {
    pub(crate) fn new(winner: Side, history: Vec<PlyRecord>, board: Board) -> Self {
        let forced = |side: Side| {
            history
                .iter()
                .filter(|ply| ply.side == side && ply.forced.is_some())
                .count()
        };
        Self {
            winner,
            plies: history.len(),
            black_random_moves: forced(Side::Black),
            white_random_moves: forced(Side::White),
            history,
            board,
        }
    }

    /// True if Black, the primary agent, won.
    pub fn primary_won(&self) -> bool {
        self.winner == Side::Black
    }

    /// Number of fallback moves substituted for `side`.
    pub fn random_moves(&self, side: Side) -> usize {
        match side {
            Side::Black => self.black_random_moves,
            Side::White => self.white_random_moves,
        }
    }
}

impl std::fmt::Display for MatchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} wins after {} plies (random moves: Black {}, White {})",
            self.winner, self.plies, self.black_random_moves, self.white_random_moves
        )
    }
}

/// How a match ended.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MatchOutcome {
    /// Played to a result.
    #[display("{}", _0)]
    Finished(MatchReport),
    /// An agent could not be set up, so no moves were played.
    #[display("Match aborted: {}", reason)]
    Aborted {
        /// Which seat failed and why.
        reason: String,
    },
}

impl MatchOutcome {
    /// Returns the report if the match was played.
    pub fn report(&self) -> Option<&MatchReport> {
        match self {
            MatchOutcome::Finished(report) => Some(report),
            MatchOutcome::Aborted { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts_forced_moves_per_side() {
        let history = vec![
            PlyRecord::new(Side::Black, Move::from(((1, 0), (2, 0))), None),
            PlyRecord::new(
                Side::White,
                Move::from(((4, 0), (3, 0))),
                Some("timed out".to_string()),
            ),
            PlyRecord::new(
                Side::Black,
                Move::from(((2, 0), (3, 1))),
                Some("illegal move".to_string()),
            ),
            PlyRecord::new(
                Side::White,
                Move::from(((4, 1), (3, 1))),
                Some("failed".to_string()),
            ),
        ];
        let report = MatchReport::new(Side::White, history, Board::initial());
        assert_eq!(*report.plies(), 4);
        assert_eq!(report.random_moves(Side::Black), 1);
        assert_eq!(report.random_moves(Side::White), 2);
        assert!(!report.primary_won());
        assert_eq!(
            report.to_string(),
            "White wins after 4 plies (random moves: Black 1, White 2)"
        );
    }
}
