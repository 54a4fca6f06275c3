//! Board rule errors.

/// Error raised by board rules.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardError {
    /// No Black pawn has a legal move. Only reachable on a finished board.
    #[display("No valid move available for Black")]
    NoValidMove,

    /// A fixture row had the wrong length or an unknown symbol.
    #[display("Invalid board row {}: {:?}", row, text)]
    InvalidRow {
        /// Row index of the bad line.
        row: usize,
        /// The offending text.
        text: String,
    },
}
