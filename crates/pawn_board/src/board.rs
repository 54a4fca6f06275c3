//! The 6x6 board.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{BoardError, Cell, Position};

/// Number of rows on the board.
pub const ROWS: usize = 6;
/// Number of columns on the board.
pub const COLS: usize = 6;

/// A fully populated 6x6 grid.
///
/// Serializes as a nested array of `"B"`, `"W"` and `"_"` strings, one inner
/// array per row, which is also what external agents receive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Standard starting position: Black on rows 0-1, White on rows 4-5.
    #[instrument]
    pub fn initial() -> Self {
        let mut cells = [[Cell::Empty; COLS]; ROWS];
        for row in 0..2 {
            cells[row] = [Cell::BlackPawn; COLS];
            cells[ROWS - 1 - row] = [Cell::WhitePawn; COLS];
        }
        Self { cells }
    }

    /// Builds a board from six rows of `B`, `W` and `_` characters.
    ///
    /// ```
    /// use pawn_board::{Board, Cell, Position};
    ///
    /// let board = Board::from_rows([
    ///     "B_____", "______", "______", "______", "______", "_____W",
    /// ])?;
    /// assert_eq!(board.get(Position::new(0, 0)), Some(Cell::BlackPawn));
    /// # Ok::<(), pawn_board::BoardError>(())
    /// ```
    pub fn from_rows(rows: [&str; ROWS]) -> Result<Self, BoardError> {
        let mut cells = [[Cell::Empty; COLS]; ROWS];
        for (r, text) in rows.iter().enumerate() {
            let invalid = || BoardError::InvalidRow {
                row: r,
                text: (*text).to_string(),
            };
            if text.chars().count() != COLS {
                return Err(invalid());
            }
            for (c, symbol) in text.chars().enumerate() {
                cells[r][c] = Cell::from_symbol(symbol).ok_or_else(invalid)?;
            }
        }
        Ok(Self { cells })
    }

    /// Cell at `pos`, or `None` when `pos` is off the board.
    pub fn get(&self, pos: Position) -> Option<Cell> {
        pos.index().map(|(r, c)| self.cells[r][c])
    }

    /// Overwrites the cell at `pos`. Returns `false` when `pos` is off the board.
    pub fn set(&mut self, pos: Position, cell: Cell) -> bool {
        match pos.index() {
            Some((r, c)) => {
                self.cells[r][c] = cell;
                true
            }
            None => false,
        }
    }

    /// Rows of the grid, top (row 0) first.
    pub fn rows(&self) -> &[[Cell; COLS]; ROWS] {
        &self.cells
    }

    /// Number of cells holding `cell`.
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().flatten().filter(|&&c| c == cell).count()
    }

    /// Inverts the board in place: rows reversed, pawn colours swapped.
    #[instrument(skip(self))]
    pub fn invert(&mut self) {
        self.cells.reverse();
        for cell in self.cells.iter_mut().flatten() {
            *cell = cell.swapped();
        }
    }

    /// Returns an inverted copy, leaving `self` untouched.
    pub fn inverted(&self) -> Self {
        let mut copy = self.clone();
        copy.invert();
        copy
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rule = format!("+{}", "-----+".repeat(COLS));
        for row in &self.cells {
            writeln!(f, "{}", rule)?;
            let tiles: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => " ".to_string(),
                    other => other.symbol().to_string(),
                })
                .collect();
            writeln!(f, "|  {}  |", tiles.join("  |  "))?;
        }
        write!(f, "{}", rule)
    }
}

/// Prints the board grid to stdout.
pub fn print_state(board: &Board) {
    println!("{}", board);
}
