//! Pseudo-legal move generation and attack queries.
//!
//! The generator emits pseudo-legal moves; legality is decided by
//! `Position::make_move`, which rejects moves that leave the mover's king
//! in check. Castling is the one exception where attacked squares are
//! checked up front, except for the destination square, which the
//! make-move legality step already covers.

use super::attack_tables::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks,
};
use super::error::MoveParseError;
use super::state::Position;
use super::types::{Color, Move, MoveList, Piece, PieceType, Square, NORTH, SOUTH};

/// Pieces a pawn can promote to, in the conventional generation order
const PROMOTION_TYPES: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

fn pawn_push_target(source: Square, dir: i8) -> Option<Square> {
    let idx = source.index() as i8 + dir;
    (0..64).contains(&idx).then(|| Square::from_index(idx as usize))
}

impl Position {
    /// Append all pseudo-legal moves for the side to move
    pub fn generate_moves(&self, moves: &mut MoveList) {
        self.generate_pawn_moves(moves);
        self.generate_piece_moves(PieceType::Knight, moves);
        self.generate_piece_moves(PieceType::Bishop, moves);
        self.generate_piece_moves(PieceType::Rook, moves);
        self.generate_piece_moves(PieceType::Queen, moves);
        self.generate_piece_moves(PieceType::King, moves);
        self.generate_castling_moves(moves);
    }

    fn generate_pawn_moves(&self, moves: &mut MoveList) {
        let side = self.side_to_move();
        let pawn = Piece::new(PieceType::Pawn, side);
        let (push_dir, start_rank, promotion_rank) = match side {
            Color::White => (NORTH, 1, 7),
            Color::Black => (SOUTH, 6, 0),
        };

        for source in self.pieces(pawn) {
            // Pushes. The target is only off the board for hand-built
            // positions with a pawn on its own back rank.
            if let Some(target) = pawn_push_target(source, push_dir) {
                if !self.occupancy_both().contains(target) {
                    if target.rank() == promotion_rank {
                        for promo in PROMOTION_TYPES {
                            moves.push(Move::promotion(
                                source,
                                target,
                                pawn,
                                Piece::new(promo, side),
                                false,
                            ));
                        }
                    } else {
                        moves.push(Move::quiet(source, target, pawn));
                        if source.rank() == start_rank {
                            let double_target = target.offset(push_dir);
                            if !self.occupancy_both().contains(double_target) {
                                moves.push(Move::double_push(source, double_target, pawn));
                            }
                        }
                    }
                }
            }

            // Captures
            for target in pawn_attacks(source, side) {
                if self.occupancy(side.opponent()).contains(target) {
                    if target.rank() == promotion_rank {
                        for promo in PROMOTION_TYPES {
                            moves.push(Move::promotion(
                                source,
                                target,
                                pawn,
                                Piece::new(promo, side),
                                true,
                            ));
                        }
                    } else {
                        moves.push(Move::capture(source, target, pawn));
                    }
                } else if Some(target) == self.en_passant_square() {
                    moves.push(Move::en_passant(source, target, pawn));
                }
            }
        }
    }

    fn generate_piece_moves(&self, piece_type: PieceType, moves: &mut MoveList) {
        let side = self.side_to_move();
        let piece = Piece::new(piece_type, side);
        let occupancy = self.occupancy_both();

        for source in self.pieces(piece) {
            let attacks = match piece_type {
                PieceType::Knight => knight_attacks(source),
                PieceType::Bishop => bishop_attacks(source, occupancy),
                PieceType::Rook => rook_attacks(source, occupancy),
                PieceType::Queen => queen_attacks(source, occupancy),
                PieceType::King => king_attacks(source),
                PieceType::Pawn => unreachable!("pawns have their own generator"),
            };

            for target in attacks.and(self.occupancy(side).not()) {
                if self.occupancy(side.opponent()).contains(target) {
                    moves.push(Move::capture(source, target, piece));
                } else {
                    moves.push(Move::quiet(source, target, piece));
                }
            }
        }
    }

    fn generate_castling_moves(&self, moves: &mut MoveList) {
        let side = self.side_to_move();
        let opponent = side.opponent();
        let king = Piece::new(PieceType::King, side);
        let occupancy = self.occupancy_both();
        let rights = self.state.castling_rights;

        let (king_square, kingside_path, queenside_path) = match side {
            Color::White => (
                Square::E1,
                [Square::F1, Square::G1],
                [Square::D1, Square::C1, Square::B1],
            ),
            Color::Black => (
                Square::E8,
                [Square::F8, Square::G8],
                [Square::D8, Square::C8, Square::B8],
            ),
        };

        if rights.has(side, true)
            && !kingside_path.iter().any(|&sq| occupancy.contains(sq))
            && !self.is_square_attacked(king_square, opponent)
            && !self.is_square_attacked(kingside_path[0], opponent)
        {
            moves.push(Move::castle(king_square, kingside_path[1], king));
        }

        if rights.has(side, false)
            && !queenside_path.iter().any(|&sq| occupancy.contains(sq))
            && !self.is_square_attacked(king_square, opponent)
            && !self.is_square_attacked(queenside_path[0], opponent)
        {
            moves.push(Move::castle(king_square, queenside_path[1], king));
        }
    }

    /// Whether the square is attacked by any piece of the given side
    #[must_use]
    pub fn is_square_attacked(&self, sq: Square, side: Color) -> bool {
        let occupancy = self.occupancy_both();

        // A pawn of `side` attacks `sq` exactly when a pawn of the other
        // color standing on `sq` would attack the pawn's square.
        pawn_attacks(sq, side.opponent())
            .intersects(self.pieces(Piece::new(PieceType::Pawn, side)))
            || knight_attacks(sq).intersects(self.pieces(Piece::new(PieceType::Knight, side)))
            || bishop_attacks(sq, occupancy)
                .intersects(self.pieces(Piece::new(PieceType::Bishop, side)))
            || rook_attacks(sq, occupancy)
                .intersects(self.pieces(Piece::new(PieceType::Rook, side)))
            || queen_attacks(sq, occupancy)
                .intersects(self.pieces(Piece::new(PieceType::Queen, side)))
            || king_attacks(sq).intersects(self.pieces(Piece::new(PieceType::King, side)))
    }

    /// Whether the side to move is in check
    #[must_use]
    pub fn in_check(&self) -> bool {
        let side = self.side_to_move();
        self.is_square_attacked(self.king_square(side), side.opponent())
    }

    /// Parse a UCI move string against the pseudo-legal moves of this
    /// position. Legality is still decided when the move is made.
    pub fn parse_move(&self, notation: &str) -> Result<Move, MoveParseError> {
        let mut moves = MoveList::new();
        self.generate_moves(&mut moves);
        moves
            .iter()
            .copied()
            .find(|mv| mv.to_string() == notation)
            .ok_or_else(|| MoveParseError::NoMatchingMove {
                notation: notation.to_string(),
            })
    }
}
