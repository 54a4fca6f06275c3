//! Pawn-race board model.
//!
//! A 6x6 board where each side starts with two full rows of pawns and
//! races to the opposite edge. Pawns step one row forward, either straight
//! into an empty cell or diagonally into an empty cell or onto an enemy pawn.
//!
//! # Perspective
//!
//! All move rules are written for [`Cell::BlackPawn`] moving towards higher
//! row numbers. White is played by inverting the board (reverse the rows and
//! swap colours), asking for a Black move, and inverting back. See
//! [`Board::invert`] and [`Move::mirrored`].
//!
//! # Example
//!
//! ```
//! use pawn_board::{Board, Move, Position};
//!
//! let mut board = Board::initial();
//! let mv = Move::new(Position::new(1, 0), Position::new(2, 0));
//! assert!(board.is_valid_move(mv.src, mv.dst));
//! assert!(board.apply_move(mv));
//! assert!(!board.is_game_over());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod error;
mod position;
mod rules;
mod types;

pub use board::{Board, COLS, ROWS, print_state};
pub use error::BoardError;
pub use position::{Move, Position};
pub use types::{Cell, Side};
