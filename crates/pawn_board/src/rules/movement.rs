//! Move legality and move application.

use tracing::{instrument, trace};

use crate::{Board, BoardError, Cell, Move, Position};

/// Column offsets tried for each pawn: diagonal-left, straight, diagonal-right.
const STEPS: [i32; 3] = [-1, 0, 1];

impl Board {
    /// Checks whether moving the Black pawn at `src` to `dst` is legal.
    ///
    /// A move is legal when `src` holds a Black pawn, `dst` is on the board
    /// exactly one row further, and at most one column over. A straight step
    /// needs an empty destination; a diagonal step may land on an empty cell
    /// or capture a White pawn, but never on another Black pawn.
    ///
    /// Off-board coordinates are rejected rather than panicking.
    pub fn is_valid_move(&self, src: Position, dst: Position) -> bool {
        if self.get(src) != Some(Cell::BlackPawn) {
            return false;
        }
        let Some(target) = self.get(dst) else {
            return false;
        };
        if dst.row != src.row + 1 {
            return false;
        }
        match dst.col - src.col {
            0 => target == Cell::Empty,
            -1 | 1 => target != Cell::BlackPawn,
            _ => false,
        }
    }

    /// Every legal Black move, in row-major pawn order and
    /// diagonal-left, straight, diagonal-right order per pawn.
    pub fn valid_moves(&self) -> Vec<Move> {
        self.black_pawns()
            .flat_map(|src| STEPS.iter().map(move |&d| Move::new(src, src.offset(1, d))))
            .filter(|mv| self.is_valid_move(mv.src, mv.dst))
            .collect()
    }

    /// First legal Black move in the order of [`Board::valid_moves`].
    ///
    /// This is the referee's fallback when an agent fails to produce a
    /// usable move.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NoValidMove`] when Black cannot move, which
    /// only happens on a board where [`Board::is_game_over`] is true.
    #[instrument(skip(self))]
    pub fn first_valid_move(&self) -> Result<Move, BoardError> {
        for src in self.black_pawns() {
            for d in STEPS {
                let dst = src.offset(1, d);
                if self.is_valid_move(src, dst) {
                    trace!(%src, %dst, "Fallback move found");
                    return Ok(Move::new(src, dst));
                }
            }
        }
        Err(BoardError::NoValidMove)
    }

    /// Applies `mv` if it is legal. Returns `true` when the board changed.
    ///
    /// An illegal move leaves every cell untouched.
    #[instrument(skip(self, mv), fields(mv = %mv))]
    pub fn apply_move(&mut self, mv: Move) -> bool {
        if !self.is_valid_move(mv.src, mv.dst) {
            return false;
        }
        self.set(mv.src, Cell::Empty);
        self.set(mv.dst, Cell::BlackPawn);
        true
    }

    /// Returns a copy with `mv` applied (or an identical copy if illegal).
    pub fn with_move(&self, mv: Move) -> Board {
        let mut next = self.clone();
        next.apply_move(mv);
        next
    }

    fn black_pawns(&self) -> impl Iterator<Item = Position> + '_ {
        self.rows().iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| **cell == Cell::BlackPawn)
                .map(move |(c, _)| Position::new(r as i32, c as i32))
        })
    }
}
