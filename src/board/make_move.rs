//! Making moves.

use crate::zobrist::KEYS;

use super::state::Position;
use super::types::{Color, Move, Piece, PieceType, Square, NORTH, SOUTH};

impl Position {
    /// Apply a move to the position, returning whether it was legal.
    ///
    /// The position is advanced on success and left untouched on failure.
    /// With `captures_only` set, non-captures are rejected up front; the
    /// quiescence search generates all moves and lets the position filter.
    ///
    /// Legality is checked last: after the move is applied, the mover's
    /// king must not be attacked by the new side to move, otherwise the
    /// pre-move snapshot is restored.
    pub fn make_move(&mut self, mv: Move, captures_only: bool) -> bool {
        if captures_only && !mv.is_capture() {
            return false;
        }

        let snapshot = self.state;

        let source = mv.source();
        let target = mv.target();
        let piece = mv.piece();
        let color = piece.color();

        if mv.is_capture() || piece.piece_type() == PieceType::Pawn {
            self.state.halfmove_clock = 0;
        } else {
            self.state.halfmove_clock += 1;
        }
        self.state.ply += 1;

        // The captured piece must be read before the mover lands on the
        // target. En passant captures an empty target square and is
        // handled separately.
        let captured = if mv.is_capture() && !mv.is_en_passant() {
            self.piece_on(target)
        } else {
            None
        };

        self.state.piece_bitboards[piece.index()].clear(source);
        self.state.piece_bitboards[piece.index()].set(target);
        self.state.key ^= KEYS.piece(piece, source);
        self.state.key ^= KEYS.piece(piece, target);

        if let Some(captured) = captured {
            self.state.piece_bitboards[captured.index()].clear(target);
            self.state.key ^= KEYS.piece(captured, target);
        }

        if let Some(promoted) = mv.promoted() {
            self.state.piece_bitboards[piece.index()].clear(target);
            self.state.piece_bitboards[promoted.index()].set(target);
            self.state.key ^= KEYS.piece(piece, target);
            self.state.key ^= KEYS.piece(promoted, target);
        }

        if mv.is_en_passant() {
            let captured_square = match color {
                Color::White => target.offset(SOUTH),
                Color::Black => target.offset(NORTH),
            };
            let captured_pawn = Piece::new(PieceType::Pawn, color.opponent());
            self.state.piece_bitboards[captured_pawn.index()].clear(captured_square);
            self.state.key ^= KEYS.piece(captured_pawn, captured_square);
        }

        if let Some(old_ep) = self.state.en_passant_square {
            self.state.key ^= KEYS.en_passant(old_ep);
        }
        self.state.en_passant_square = None;

        if mv.is_double_push() {
            let ep_square = match color {
                Color::White => target.offset(SOUTH),
                Color::Black => target.offset(NORTH),
            };
            self.state.en_passant_square = Some(ep_square);
            self.state.key ^= KEYS.en_passant(ep_square);
        }

        if mv.is_castle() {
            let (rook_source, rook_target) = if target == Square::G1 {
                (Square::H1, Square::F1)
            } else if target == Square::C1 {
                (Square::A1, Square::D1)
            } else if target == Square::G8 {
                (Square::H8, Square::F8)
            } else {
                (Square::A8, Square::D8)
            };
            let rook = Piece::new(PieceType::Rook, color);
            self.state.piece_bitboards[rook.index()].clear(rook_source);
            self.state.piece_bitboards[rook.index()].set(rook_target);
            self.state.key ^= KEYS.piece(rook, rook_source);
            self.state.key ^= KEYS.piece(rook, rook_target);
        }

        self.state.key ^= KEYS.castling(self.state.castling_rights.as_u8());
        self.state.castling_rights.update_for_move(source, target);
        self.state.key ^= KEYS.castling(self.state.castling_rights.as_u8());

        self.generate_occupancies();

        self.state.side_to_move = self.state.side_to_move.opponent();
        self.state.key ^= KEYS.side();

        let king_square = self.king_square(color);
        if self.is_square_attacked(king_square, self.state.side_to_move) {
            self.state = snapshot;
            return false;
        }

        true
    }

    /// Pass the turn without moving: clear the en passant square and flip
    /// the side to move, keeping the key in sync. Used by null-move
    /// pruning; the caller restores a snapshot afterwards.
    pub fn make_null_move(&mut self) {
        if let Some(ep) = self.state.en_passant_square {
            self.state.key ^= KEYS.en_passant(ep);
            self.state.en_passant_square = None;
        }
        self.state.side_to_move = self.state.side_to_move.opponent();
        self.state.key ^= KEYS.side();
    }
}
