//! Match driver.
//!
//! Black always moves first. Both agents are written as if they play Black:
//! before White is asked for a move the board is inverted, and after its move
//! is applied it is inverted back. Whatever an agent does wrong, the referee
//! plays the first legal move in its place and the match goes on.

mod error;
mod report;
mod seat;

pub use error::RefereeError;
pub use report::{MatchOutcome, MatchReport, PlyRecord};

use pawn_board::{Board, Side};
use tracing::{info, instrument, warn};

use crate::agent::AgentSpec;
use crate::config::RefereeConfig;
use crate::sandbox::{MoveOutcome, ProcessSandbox, ThreadSandbox};
use seat::Seat;

/// Plays matches between two agents.
#[derive(Debug, Clone, Default, derive_getters::Getters)]
pub struct Referee {
    config: RefereeConfig,
}

impl Referee {
    /// Creates a referee with the given configuration.
    pub fn new(config: RefereeConfig) -> Self {
        Self { config }
    }

    /// Plays a match on the standard starting board.
    pub async fn play_from_start(
        &self,
        black: AgentSpec,
        white: AgentSpec,
    ) -> Result<MatchOutcome, RefereeError> {
        self.play(black, white, Board::initial()).await
    }

    /// Plays a match from `board` until one side wins.
    ///
    /// Returns [`MatchOutcome::Aborted`] if either agent cannot be set up,
    /// Black checked first.
    ///
    /// # Errors
    ///
    /// Returns [`RefereeError`] if the side to move has no legal move on an
    /// unfinished board, or the ply cap is reached.
    #[instrument(skip_all, fields(black = %black.label(), white = %white.label()))]
    pub async fn play(
        &self,
        black: AgentSpec,
        white: AgentSpec,
        mut board: Board,
    ) -> Result<MatchOutcome, RefereeError> {
        let black_label = black.label();
        let mut black = match Seat::prepare(black) {
            Ok(seat) => seat,
            Err(e) => return Ok(aborted(Side::Black, &black_label, &e.message)),
        };
        let white_label = white.label();
        let mut white = match Seat::prepare(white) {
            Ok(seat) => seat,
            Err(e) => return Ok(aborted(Side::White, &white_label, &e.message)),
        };

        let process = ProcessSandbox::new(self.config.move_timeout());
        let thread = ThreadSandbox::new(self.config.move_timeout());
        let max_plies = *self.config.max_plies();
        let mut history = Vec::new();

        info!("Match started");
        let winner = loop {
            if let Some(winner) = board.winner() {
                break winner;
            }

            let ply = history.len();
            if ply >= max_plies {
                warn!(limit = max_plies, "Ply cap reached");
                return Err(RefereeError::PlyLimit { limit: max_plies });
            }

            let side = Side::for_ply(ply);
            let seat = match side {
                Side::Black => &mut black,
                Side::White => &mut white,
            };

            if side == Side::White {
                board.invert();
            }

            let outcome = seat.request_move(&board, &process, &thread).await;
            let (mv, forced) = match outcome {
                MoveOutcome::Produced(mv) if board.is_valid_move(mv.src, mv.dst) => (mv, None),
                other => {
                    let reason = match other {
                        MoveOutcome::Produced(mv) => format!("illegal move {}", mv),
                        other => other.to_string(),
                    };
                    let fallback = board.first_valid_move().map_err(|_| RefereeError::NoFallback {
                        side,
                        plies: ply,
                        board: board.clone(),
                    })?;
                    warn!(
                        side = %side,
                        agent = %seat.label(),
                        reason = %reason,
                        fallback = %fallback,
                        "Substituting first legal move"
                    );
                    (fallback, Some(reason))
                }
            };

            board.apply_move(mv);
            let mv = if side == Side::White {
                board.invert();
                mv.mirrored()
            } else {
                mv
            };

            info!(ply, side = %side, mv = %mv, forced = forced.is_some(), "Ply played");
            history.push(PlyRecord::new(side, mv, forced));
        };

        let report = MatchReport::new(winner, history, board);
        info!(
            winner = %winner,
            plies = *report.plies(),
            black_random_moves = report.random_moves(Side::Black),
            white_random_moves = report.random_moves(Side::White),
            "Match finished"
        );
        Ok(MatchOutcome::Finished(report))
    }
}

fn aborted(side: Side, label: &str, message: &str) -> MatchOutcome {
    let reason = format!("{}({}) failed to initialise: {}", side, label, message);
    warn!(reason = %reason, "Match aborted");
    MatchOutcome::Aborted { reason }
}
