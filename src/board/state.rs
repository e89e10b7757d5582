//! Position representation.

use std::fmt;

use crate::repetition::RepetitionRing;
use crate::zobrist::KEYS;

use super::types::{Bitboard, CastlingRights, Color, Piece, PieceType, Square, PIECE_COUNT};

pub(crate) const STARTING_POSITION_FEN: &str =
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// The complete value state of a position.
///
/// Small and `Copy`: the search snapshots it before every move attempt and
/// restores it on illegality or when unwinding, instead of keeping an
/// undo log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionState {
    /// One bitboard per colored piece
    pub(crate) piece_bitboards: [Bitboard; PIECE_COUNT],
    /// White, black and combined occupancy, derived from the piece bitboards
    pub(crate) occupancy: [Bitboard; 3],
    pub(crate) side_to_move: Color,
    pub(crate) en_passant_square: Option<Square>,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) halfmove_clock: u32,
    /// Plies since the start of recorded history
    pub(crate) ply: u32,
    /// Incrementally maintained Zobrist key
    pub(crate) key: u64,
}

impl PositionState {
    pub(crate) fn empty() -> Self {
        PositionState {
            piece_bitboards: [Bitboard::EMPTY; PIECE_COUNT],
            occupancy: [Bitboard::EMPTY; 3],
            side_to_move: Color::White,
            en_passant_square: None,
            castling_rights: CastlingRights::none(),
            halfmove_clock: 0,
            ply: 0,
            key: 0,
        }
    }
}

/// A chess position.
///
/// Owns the state plus the ring of recent Zobrist keys used for
/// threefold-repetition detection. The repetition ring is deliberately not
/// part of the snapshot: the search pushes and pops it explicitly around
/// each move.
#[derive(Clone, Debug)]
pub struct Position {
    pub(crate) state: PositionState,
    pub(crate) repetition: RepetitionRing,
}

/// Index of the combined occupancy in `PositionState::occupancy`
pub(crate) const BOTH: usize = 2;

impl Position {
    /// Create a position set to the standard starting position
    #[must_use]
    pub fn new() -> Self {
        let mut position = Position {
            state: PositionState::empty(),
            repetition: RepetitionRing::new(),
        };
        position
            .set_from_fen(STARTING_POSITION_FEN)
            .unwrap_or_else(|_| unreachable!("starting position FEN is valid"));
        position
    }

    /// Reset to the standard starting position
    pub fn reset(&mut self) {
        self.state = PositionState::empty();
        let _ = self.set_from_fen(STARTING_POSITION_FEN);
    }

    /// A copy of the current state, used to restore after move attempts
    #[inline]
    #[must_use]
    pub fn state(&self) -> PositionState {
        self.state
    }

    /// Restore a previously captured state
    #[inline]
    pub fn set_state(&mut self, state: PositionState) {
        self.state = state;
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> u64 {
        self.state.key
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.state.side_to_move
    }

    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.state.halfmove_clock
    }

    #[inline]
    #[must_use]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.state.en_passant_square
    }

    #[must_use]
    pub fn repetition_ring(&self) -> &RepetitionRing {
        &self.repetition
    }

    pub fn repetition_ring_mut(&mut self) -> &mut RepetitionRing {
        &mut self.repetition
    }

    /// The piece on the given square, scanning the piece bitboards
    #[must_use]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        Piece::ALL
            .into_iter()
            .find(|piece| self.state.piece_bitboards[piece.index()].contains(sq))
    }

    /// Bitboard of the given piece
    #[inline]
    #[must_use]
    pub fn pieces(&self, piece: Piece) -> Bitboard {
        self.state.piece_bitboards[piece.index()]
    }

    /// Occupancy of one color
    #[inline]
    #[must_use]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.state.occupancy[color.index()]
    }

    /// Combined occupancy of both colors
    #[inline]
    #[must_use]
    pub fn occupancy_both(&self) -> Bitboard {
        self.state.occupancy[BOTH]
    }

    /// Rebuild the occupancy bitboards from the piece bitboards. Must be
    /// called whenever a piece bitboard changes.
    pub(crate) fn generate_occupancies(&mut self) {
        let mut white = Bitboard::EMPTY;
        let mut black = Bitboard::EMPTY;
        for piece_type in 0..6 {
            white = white.or(self.state.piece_bitboards[piece_type]);
            black = black.or(self.state.piece_bitboards[piece_type + 6]);
        }
        self.state.occupancy[Color::White.index()] = white;
        self.state.occupancy[Color::Black.index()] = black;
        self.state.occupancy[BOTH] = white.or(black);
    }

    /// Recompute the Zobrist key from scratch.
    ///
    /// Always equal to the incrementally maintained `key` after any
    /// sequence of successful moves.
    #[must_use]
    pub fn generate_key(&self) -> u64 {
        let mut key = 0u64;
        for piece in Piece::ALL {
            for sq in self.state.piece_bitboards[piece.index()] {
                key ^= KEYS.piece(piece, sq);
            }
        }
        if let Some(ep) = self.state.en_passant_square {
            key ^= KEYS.en_passant(ep);
        }
        if self.state.side_to_move == Color::Black {
            key ^= KEYS.side();
        }
        key ^= KEYS.castling(self.state.castling_rights.as_u8());
        key
    }

    /// Number of pieces other than pawns and kings, over both colors.
    /// Used to gate null-move pruning out of pawn endgames.
    #[must_use]
    pub(crate) fn non_pawn_king_count(&self) -> u32 {
        let pawns = self
            .pieces(Piece::WhitePawn)
            .or(self.pieces(Piece::BlackPawn));
        let kings = self
            .pieces(Piece::WhiteKing)
            .or(self.pieces(Piece::BlackKing));
        self.occupancy_both()
            .and(pawns.not())
            .and(kings.not())
            .popcount()
    }

    /// The king square of the given color
    #[inline]
    #[must_use]
    pub(crate) fn king_square(&self, color: Color) -> Square {
        self.pieces(Piece::new(PieceType::King, color)).lsb()
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n  --- --- --- --- --- --- --- --- ")?;
        for rank in (0..8).rev() {
            for file in 0..8 {
                let sq = Square::from_file_rank(file, rank);
                let piece_char = self.piece_on(sq).map_or(' ', Piece::to_char);
                write!(f, " | {piece_char}")?;
            }
            writeln!(f, " | {}", rank + 1)?;
            writeln!(f, "  --- --- --- --- --- --- --- --- ")?;
        }
        writeln!(f, "   a   b   c   d   e   f   g   h\n")?;
        write!(f, "Fen: {}", self.to_fen())
    }
}
