//! Tapered static evaluation.
//!
//! Material and piece-square values are accumulated separately for the
//! midgame and endgame, blended by a game-phase counter, plus small
//! structural terms for pawns, rooks, mobility and king cover. The score
//! is always from the side to move's perspective.

use once_cell::sync::Lazy;

use super::attack_tables::{
    bishop_attacks, isolated_pawn_mask, king_attacks, passed_pawn_mask, queen_attacks,
};
use super::state::Position;
use super::types::{Bitboard, Color, Piece, PieceType, PIECE_COUNT};

const DOUBLED_PAWN_PENALTY: i32 = -10;
const ISOLATED_PAWN_PENALTY: i32 = -10;
/// Indexed by the pawn's rank from its own side's viewpoint
const PASSED_PAWN_BONUS: [i32; 8] = [0, 10, 30, 50, 75, 100, 150, 200];
const BISHOP_MOBILITY_BONUS: i32 = 3;
const QUEEN_MOBILITY_BONUS: i32 = 1;
const ROOK_SEMI_OPEN_FILE_BONUS: i32 = 10;
const ROOK_OPEN_FILE_BONUS: i32 = 15;
const KING_SEMI_OPEN_FILE_PENALTY: i32 = -10;
const KING_OPEN_FILE_PENALTY: i32 = -15;
const KING_SHIELD_BONUS: i32 = 5;
const BISHOP_PAIR_BONUS: i32 = 30;

/// Phase contribution per colored piece (N=B=1, R=2, Q=4), capped at 24
const GAME_PHASE_INC: [i32; PIECE_COUNT] = [0, 1, 1, 2, 4, 0, 0, 1, 1, 2, 4, 0];
const MAX_PHASE: i32 = 24;

const MATERIAL_MG: [i32; 6] = [82, 337, 365, 477, 1025, 20000];
const MATERIAL_EG: [i32; 6] = [94, 281, 297, 512, 936, 20000];

// Piece-square tables, one row per rank starting at rank 1 (white's
// perspective, a1 first).
#[rustfmt::skip]
const PST_MG: [[i32; 64]; 6] = [
    [
        0, 0, 0, 0, 0, 0, 0, 0, -35, -1, -20, -23, -15, 24, 38, -22, -26, -4, -4, -10, 3,
        3, 33, -12, -27, -2, -5, 12, 17, 6, 10, -25, -14, 13, 6, 21, 23, 12, 17, -23, -6,
        7, 26, 31, 65, 56, 25, -20, 98, 134, 61, 95, 68, 126, 34, -11, 0, 0, 0, 0, 0, 0, 0,
        0,
    ],
    [
        -105, -21, -58, -33, -17, -28, -19, -23, -29, -53, -12, -3, -1, 18, -14, -19, -23,
        -9, 12, 10, 19, 17, 25, -16, -13, 4, 16, 13, 28, 19, 21, -8, -9, 17, 19, 53, 37,
        69, 18, 22, -47, 60, 37, 65, 84, 129, 73, 44, -73, -41, 72, 36, 23, 62, 7, -17,
        -167, -89, -34, -49, 61, -97, -15, -107,
    ],
    [
        -33, -3, -14, -21, -13, -12, -39, -21, 4, 15, 16, 0, 7, 21, 33, 1, 0, 15, 15, 15,
        14, 27, 18, 10, -6, 13, 13, 26, 34, 12, 10, 4, -4, 5, 19, 50, 37, 37, 7, -2, -16,
        37, 43, 40, 35, 50, 37, -2, -26, 16, -18, -13, 30, 59, 18, -47, -29, 4, -82, -37,
        -25, -42, 7, -8,
    ],
    [
        -19, -13, 1, 17, 16, 7, -37, -26, -44, -16, -20, -9, -1, 11, -6, -71, -45, -25,
        -16, -17, 3, 0, -5, -33, -36, -26, -12, -1, 9, -7, 6, -23, -24, -11, 7, 26, 24, 35,
        -8, -20, -5, 19, 26, 36, 17, 45, 61, 16, 27, 32, 58, 62, 80, 67, 26, 44, 32, 42,
        32, 51, 63, 9, 31, 43,
    ],
    [
        -1, -18, -9, 10, -15, -25, -31, -50, -35, -8, 11, 2, 8, 15, -3, 1, -14, 2, -11, -2,
        -5, 2, 14, 5, -9, -26, -9, -10, -2, -4, 3, -3, -27, -27, -16, -16, -1, 17, -2, 1,
        -13, -17, 7, 8, 29, 56, 47, 57, -24, -39, -5, 1, -16, 57, 28, 54, -28, 0, 29, 12,
        59, 44, 43, 45,
    ],
    [
        -15, 36, 12, -54, 8, -28, 34, 14, 1, 7, -8, -64, -43, -16, 9, 8, -14, -14, -22,
        -46, -44, -30, -15, -27, -49, -1, -27, -39, -46, -44, -33, -51, -17, -20, -12, -27,
        -30, -25, -14, -36, -9, 24, 2, -16, -20, 6, 22, -22, 29, -1, -20, -7, -8, -4, -38,
        -29, -65, 23, 16, -15, -56, -34, 2, 13,
    ],
];

#[rustfmt::skip]
const PST_EG: [[i32; 64]; 6] = [
    [
        0, 0, 0, 0, 0, 0, 0, 0, 13, 8, 8, 10, 13, 0, 2, -7, 4, 7, -6, 1, 0, -5, -1, -8, 13,
        9, -3, -7, -7, -8, 3, -1, 32, 24, 13, 5, -2, 4, 17, 17, 94, 100, 85, 67, 56, 53,
        82, 84, 178, 173, 158, 134, 147, 132, 165, 187, 0, 0, 0, 0, 0, 0, 0, 0,
    ],
    [
        -29, -51, -23, -15, -22, -18, -50, -64, -42, -20, -10, -5, -2, -20, -23, -44, -23,
        -3, -1, 15, 10, -3, -20, -22, -18, -6, 16, 25, 16, 17, 4, -18, -17, 3, 22, 22, 22,
        11, 8, -18, -24, -20, 10, 9, -1, -9, -19, -41, -25, -8, -25, -2, -9, -25, -24, -52,
        -58, -38, -13, -28, -31, -27, -63, -99,
    ],
    [
        -23, -9, -23, -5, -9, -16, -5, -17, -14, -18, -7, -1, 4, -9, -15, -27, -12, -3, 8,
        10, 13, 3, -7, -15, -6, 3, 13, 19, 7, 10, -3, -9, -3, 9, 12, 9, 14, 10, 3, 2, 2,
        -8, 0, -1, -2, 6, 0, 4, -8, -4, 7, -12, -3, -13, -4, -14, -14, -21, -11, -8, -7,
        -9, -17, -24,
    ],
    [
        -9, 2, 3, -1, -5, -13, 4, -20, -6, -6, 0, 2, -9, -9, -11, -3, -4, 0, -5, -1, -7,
        -12, -8, -16, 3, 5, 8, 4, -5, -6, -8, -11, 4, 3, 13, 1, 2, 1, -1, 2, 7, 7, 7, 5, 4,
        -3, -5, -3, 11, 13, 13, 11, -3, 3, 8, 3, 13, 10, 18, 15, 12, 12, 8, 5,
    ],
    [
        -33, -28, -22, -43, -5, -32, -20, -41, -22, -23, -30, -16, -16, -23, -36, -32, -16,
        -27, 15, 6, 9, 17, 10, 5, -18, 28, 19, 47, 31, 34, 39, 23, 3, 22, 24, 45, 57, 40,
        57, 36, -20, 6, 9, 49, 47, 35, 19, 9, -17, 20, 32, 41, 58, 25, 30, 0, -9, 22, 22,
        27, 27, 19, 10, 20,
    ],
    [
        -53, -34, -21, -11, -28, -14, -24, -43, -27, -11, 4, 13, 14, 4, -5, -17, -19, -3,
        11, 21, 23, 16, 7, -9, -18, -4, 21, 24, 27, 23, 9, -11, -8, 22, 24, 27, 26, 33, 26,
        3, 10, 17, 23, 15, 20, 45, 44, 13, -12, 17, 14, 17, 17, 38, 23, 11, -74, -35, -18,
        -18, -11, 15, 4, -17,
    ],
];

struct EvalTables {
    mg: [[i32; 64]; PIECE_COUNT],
    eg: [[i32; 64]; PIECE_COUNT],
}

/// Per-piece tables with material folded in. White pieces read the
/// rank-1-first tables through a vertical mirror, black pieces directly.
static EVAL_TABLES: Lazy<EvalTables> = Lazy::new(|| {
    let mut tables = EvalTables {
        mg: [[0; 64]; PIECE_COUNT],
        eg: [[0; 64]; PIECE_COUNT],
    };
    for piece in Piece::ALL {
        let pt = piece.piece_type().index();
        for sq in 0..64 {
            let table_index = match piece.color() {
                Color::White => sq ^ 56,
                Color::Black => sq,
            };
            tables.mg[piece.index()][sq] = MATERIAL_MG[pt] + PST_MG[pt][table_index];
            tables.eg[piece.index()][sq] = MATERIAL_EG[pt] + PST_EG[pt][table_index];
        }
    }
    tables
});

/// Force table construction
pub(crate) fn init() {
    Lazy::force(&EVAL_TABLES);
}

/// Static evaluation in centipawns from the side to move's perspective
#[must_use]
pub fn evaluate(position: &Position) -> i32 {
    let mut mg = [0i32; 2];
    let mut eg = [0i32; 2];
    let mut game_phase = 0;

    let occupancy_both = position.occupancy_both();
    let white_pawns = position.pieces(Piece::WhitePawn);
    let black_pawns = position.pieces(Piece::BlackPawn);
    let all_pawns = white_pawns.or(black_pawns);

    for piece in Piece::ALL {
        let color = piece.color();
        let side = color.index();
        let own_pawns = match color {
            Color::White => white_pawns,
            Color::Black => black_pawns,
        };
        let enemy_pawns = match color {
            Color::White => black_pawns,
            Color::Black => white_pawns,
        };

        for sq in position.pieces(piece) {
            mg[side] += EVAL_TABLES.mg[piece.index()][sq.index()];
            eg[side] += EVAL_TABLES.eg[piece.index()][sq.index()];
            game_phase += GAME_PHASE_INC[piece.index()];

            let file_mask = Bitboard::file_mask(sq.file());
            match piece.piece_type() {
                PieceType::Pawn => {
                    if own_pawns.and(file_mask).popcount() > 1 {
                        mg[side] += DOUBLED_PAWN_PENALTY;
                        eg[side] += DOUBLED_PAWN_PENALTY;
                    }

                    if !own_pawns.intersects(isolated_pawn_mask(sq)) {
                        mg[side] += ISOLATED_PAWN_PENALTY;
                        eg[side] += ISOLATED_PAWN_PENALTY;
                    }

                    if !passed_pawn_mask(sq, color).intersects(enemy_pawns) {
                        let relative_rank = match color {
                            Color::White => sq.rank(),
                            Color::Black => 7 - sq.rank(),
                        };
                        mg[side] += PASSED_PAWN_BONUS[relative_rank];
                        eg[side] += PASSED_PAWN_BONUS[relative_rank];
                    }
                }
                PieceType::Bishop => {
                    let mobility = bishop_attacks(sq, occupancy_both)
                        .and(position.occupancy(color).not())
                        .popcount() as i32;
                    mg[side] += mobility * BISHOP_MOBILITY_BONUS;
                    eg[side] += mobility * BISHOP_MOBILITY_BONUS;
                }
                PieceType::Rook => {
                    if !own_pawns.intersects(file_mask) {
                        mg[side] += ROOK_SEMI_OPEN_FILE_BONUS;
                        eg[side] += ROOK_SEMI_OPEN_FILE_BONUS;
                    }
                    if !all_pawns.intersects(file_mask) {
                        mg[side] += ROOK_OPEN_FILE_BONUS;
                        eg[side] += ROOK_OPEN_FILE_BONUS;
                    }
                }
                PieceType::Queen => {
                    let mobility = queen_attacks(sq, occupancy_both)
                        .and(position.occupancy(color).not())
                        .popcount() as i32;
                    mg[side] += mobility * QUEEN_MOBILITY_BONUS;
                    eg[side] += mobility * QUEEN_MOBILITY_BONUS;
                }
                PieceType::King => {
                    if !own_pawns.intersects(file_mask) {
                        mg[side] += KING_SEMI_OPEN_FILE_PENALTY;
                        eg[side] += KING_SEMI_OPEN_FILE_PENALTY;
                    }
                    if !all_pawns.intersects(file_mask) {
                        mg[side] += KING_OPEN_FILE_PENALTY;
                        eg[side] += KING_OPEN_FILE_PENALTY;
                    }
                    let shield = king_attacks(sq)
                        .and(position.occupancy(color))
                        .popcount() as i32;
                    mg[side] += shield * KING_SHIELD_BONUS;
                    eg[side] += shield * KING_SHIELD_BONUS;
                }
                PieceType::Knight => {}
            }
        }
    }

    if position.pieces(Piece::WhiteBishop).popcount() >= 2 {
        mg[0] += BISHOP_PAIR_BONUS;
        eg[0] += BISHOP_PAIR_BONUS;
    }
    if position.pieces(Piece::BlackBishop).popcount() >= 2 {
        mg[1] += BISHOP_PAIR_BONUS;
        eg[1] += BISHOP_PAIR_BONUS;
    }

    let mg_score = mg[0] - mg[1];
    let eg_score = eg[0] - eg[1];
    let mg_phase = game_phase.min(MAX_PHASE);
    let eg_phase = MAX_PHASE - mg_phase;

    let score = (mg_score * mg_phase + eg_score * eg_phase) / MAX_PHASE;

    match position.side_to_move() {
        Color::White => score,
        Color::Black => -score,
    }
}
