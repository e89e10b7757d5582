//! Castling rights type.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Color;
use super::square::Square;

pub(crate) const CASTLE_WHITE_K: u8 = 1 << 0;
pub(crate) const CASTLE_WHITE_Q: u8 = 1 << 1;
pub(crate) const CASTLE_BLACK_K: u8 = 1 << 2;
pub(crate) const CASTLE_BLACK_Q: u8 = 1 << 3;

/// All castling rights combined
pub(crate) const ALL_CASTLING_RIGHTS: u8 =
    CASTLE_WHITE_K | CASTLE_WHITE_Q | CASTLE_BLACK_K | CASTLE_BLACK_Q;

/// Per-square AND-masks applied to the castling rights when a move leaves
/// or lands on the square. Only a1, e1, h1, a8, e8, h8 clear anything.
#[rustfmt::skip]
pub(crate) const CASTLING_UPDATES: [u8; 64] = [
     7, 15, 15, 15,  3, 15, 15, 11,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    13, 15, 15, 15, 12, 15, 15, 14,
];

/// Castling rights represented as a 4-bit mask
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastlingRights(u8);

impl CastlingRights {
    /// No castling rights
    #[must_use]
    pub const fn none() -> Self {
        CastlingRights(0)
    }

    /// All castling rights (both sides can castle both ways)
    #[must_use]
    pub const fn all() -> Self {
        CastlingRights(ALL_CASTLING_RIGHTS)
    }

    /// Check if a specific castling right is set
    #[inline]
    #[must_use]
    pub const fn has(self, color: Color, kingside: bool) -> bool {
        self.0 & Self::bit_for(color, kingside) != 0
    }

    /// Set a specific castling right
    #[inline]
    pub fn set(&mut self, color: Color, kingside: bool) {
        self.0 |= Self::bit_for(color, kingside);
    }

    /// Apply the per-square update masks for a move between two squares
    #[inline]
    pub(crate) fn update_for_move(&mut self, source: Square, target: Square) {
        self.0 &= CASTLING_UPDATES[source.index()];
        self.0 &= CASTLING_UPDATES[target.index()];
    }

    /// Get the raw bitmask value (for Zobrist hashing)
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    #[inline]
    const fn bit_for(color: Color, kingside: bool) -> u8 {
        match (color, kingside) {
            (Color::White, true) => CASTLE_WHITE_K,
            (Color::White, false) => CASTLE_WHITE_Q,
            (Color::Black, true) => CASTLE_BLACK_K,
            (Color::Black, false) => CASTLE_BLACK_Q,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rights_lifecycle() {
        let mut rights = CastlingRights::none();
        assert!(!rights.has(Color::White, true));
        rights.set(Color::White, true);
        rights.set(Color::Black, false);
        assert!(rights.has(Color::White, true));
        assert!(rights.has(Color::Black, false));
        assert!(!rights.has(Color::Black, true));
    }

    #[test]
    fn test_king_move_clears_both_rights() {
        let mut rights = CastlingRights::all();
        rights.update_for_move(Square::E1, Square::F1);
        assert!(!rights.has(Color::White, true));
        assert!(!rights.has(Color::White, false));
        assert!(rights.has(Color::Black, true));
        assert!(rights.has(Color::Black, false));
    }

    #[test]
    fn test_rook_move_clears_one_right() {
        let mut rights = CastlingRights::all();
        rights.update_for_move(Square::H8, Square::from_file_rank(7, 3));
        assert!(!rights.has(Color::Black, true));
        assert!(rights.has(Color::Black, false));
        assert!(rights.has(Color::White, true));
    }

    #[test]
    fn test_capture_on_rook_square_clears_right() {
        let mut rights = CastlingRights::all();
        // Something lands on a1: white queenside right is gone
        rights.update_for_move(Square::B8, Square::A1);
        assert!(!rights.has(Color::White, false));
        assert!(rights.has(Color::White, true));
    }
}
