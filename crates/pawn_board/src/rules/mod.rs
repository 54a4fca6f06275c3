//! Game rules for the pawn race.
//!
//! Rules are written for Black moving towards higher rows. They live apart
//! from board storage so the referee and agents share one definition of a
//! legal move.

mod movement;
mod outcome;
