//! Core domain types for the pawn race.

use serde::{Deserialize, Serialize};

/// Contents of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// A Black pawn (`"B"`).
    #[serde(rename = "B")]
    BlackPawn,
    /// A White pawn (`"W"`).
    #[serde(rename = "W")]
    WhitePawn,
    /// An empty cell (`"_"`).
    #[serde(rename = "_")]
    Empty,
}

impl Cell {
    /// Returns the cell with pawn colours exchanged. Empty stays empty.
    pub fn swapped(self) -> Self {
        match self {
            Cell::BlackPawn => Cell::WhitePawn,
            Cell::WhitePawn => Cell::BlackPawn,
            Cell::Empty => Cell::Empty,
        }
    }

    /// Single-character symbol used by [`crate::Board::from_rows`].
    pub fn symbol(self) -> char {
        match self {
            Cell::BlackPawn => 'B',
            Cell::WhitePawn => 'W',
            Cell::Empty => '_',
        }
    }

    /// Parses a symbol produced by [`Cell::symbol`].
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'B' => Some(Cell::BlackPawn),
            'W' => Some(Cell::WhitePawn),
            '_' => Some(Cell::Empty),
            _ => None,
        }
    }
}

/// One of the two sides in a match.
///
/// Black is the primary side: its pawns start on rows 0-1 and the move
/// rules are written from its point of view.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum Side {
    /// Starts on rows 0-1, moves towards row 5.
    Black,
    /// Starts on rows 4-5, moves towards row 0.
    White,
}

impl Side {
    /// Returns the other side.
    pub fn opponent(self) -> Self {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }

    /// The pawn this side owns on the true board.
    pub fn pawn(self) -> Cell {
        match self {
            Side::Black => Cell::BlackPawn,
            Side::White => Cell::WhitePawn,
        }
    }

    /// Side to move at the given ply. Black moves on even plies.
    pub fn for_ply(ply: usize) -> Self {
        if ply % 2 == 0 { Side::Black } else { Side::White }
    }
}
