//! Board representation and chess rules.

mod attack_tables;
mod error;
mod eval;
mod fen;
mod make_move;
mod movegen;
mod perft;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use error::{FenError, MoveParseError, SquareError};
pub use eval::evaluate;
pub use perft::{perft, perft_divide};
pub use state::{Position, PositionState};
pub use types::{Bitboard, CastlingRights, Color, Move, MoveList, Piece, PieceType, Square};

pub(crate) use types::ScoredMoveList;

/// Build every lazily initialized table up front so the first search does
/// not pay for construction.
pub fn init_tables() {
    attack_tables::init();
    eval::init();
    crate::zobrist::init();
}
