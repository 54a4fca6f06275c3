//! Board coordinates and moves.

use serde::{Deserialize, Serialize};

use crate::board::ROWS;

/// A `(row, column)` coordinate.
///
/// Coordinates are signed so that whatever an agent sends can be
/// represented and then rejected by the rules instead of failing to parse.
/// On the wire a position is a two-element array `[row, col]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Position {
    /// Row index, 0 at Black's home edge.
    pub row: i32,
    /// Column index.
    pub col: i32,
}

impl Position {
    /// Creates a position.
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Returns `(row, col)` as grid indices if the position lies on the board.
    pub fn index(self) -> Option<(usize, usize)> {
        let row = usize::try_from(self.row).ok()?;
        let col = usize::try_from(self.col).ok()?;
        (row < ROWS && col < crate::COLS).then_some((row, col))
    }

    /// Maps the position onto the inverted board (rows reversed, columns kept).
    pub fn mirrored(self) -> Self {
        Self::new(ROWS as i32 - 1 - self.row, self.col)
    }

    /// Position shifted by the given row and column offsets.
    pub fn offset(self, rows: i32, cols: i32) -> Self {
        Self::new(self.row + rows, self.col + cols)
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

impl From<Position> for (i32, i32) {
    fn from(pos: Position) -> Self {
        (pos.row, pos.col)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A pawn move from `src` to `dst`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Square the pawn leaves.
    pub src: Position,
    /// Square the pawn lands on.
    pub dst: Position,
}

impl Move {
    /// Creates a move.
    pub const fn new(src: Position, dst: Position) -> Self {
        Self { src, dst }
    }

    /// Maps the move between a side's perspective and the inverted board.
    ///
    /// Applying it twice gives back the original move.
    pub fn mirrored(self) -> Self {
        Self::new(self.src.mirrored(), self.dst.mirrored())
    }
}

impl From<((i32, i32), (i32, i32))> for Move {
    fn from((src, dst): ((i32, i32), (i32, i32))) -> Self {
        Self::new(src.into(), dst.into())
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.src, self.dst)
    }
}
