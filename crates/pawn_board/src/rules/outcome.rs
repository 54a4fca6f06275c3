//! End-of-game detection.

use tracing::instrument;

use crate::{Board, Cell, ROWS, Side};

impl Board {
    /// Returns `true` once a pawn has reached the far edge or a side has
    /// no pawns left.
    #[instrument(skip(self))]
    pub fn is_game_over(&self) -> bool {
        self.winner().is_some()
    }

    /// The side that has won on this board, if the game is over.
    ///
    /// Black wins by reaching the last row or capturing every White pawn;
    /// White wins by reaching row 0 or capturing every Black pawn. Black's
    /// conditions are checked first.
    pub fn winner(&self) -> Option<Side> {
        let rows = self.rows();
        if rows[ROWS - 1].contains(&Cell::BlackPawn) {
            return Some(Side::Black);
        }
        if rows[0].contains(&Cell::WhitePawn) {
            return Some(Side::White);
        }
        if self.count(Cell::WhitePawn) == 0 {
            return Some(Side::Black);
        }
        if self.count(Cell::BlackPawn) == 0 {
            return Some(Side::White);
        }
        None
    }
}
