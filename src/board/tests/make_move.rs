//! Make-move semantics: legality filtering, snapshot restore, and
//! incremental state maintenance.

use crate::board::{Color, Piece, Position, Square};

fn position_from(fen: &str) -> Position {
    let mut position = Position::new();
    position.set_from_fen(fen).unwrap();
    position
}

fn play(position: &mut Position, moves: &[&str]) {
    for notation in moves {
        let mv = position.parse_move(notation).unwrap();
        assert!(position.make_move(mv, false), "illegal move {notation}");
    }
}

#[test]
fn test_key_stays_incremental_through_a_game() {
    let mut position = Position::new();
    play(
        &mut position,
        &[
            "e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "a7a6", "b5c6", "d7c6", "e1g1", "f7f6",
            "d2d4", "e5d4", "f3d4", "c6c5",
        ],
    );
    assert_eq!(position.key(), position.generate_key());
}

#[test]
fn test_occupancy_invariants_through_a_game() {
    let mut position = Position::new();
    play(&mut position, &["d2d4", "d7d5", "c2c4", "d5c4", "e2e4", "b7b5"]);

    let white = position.occupancy(Color::White);
    let black = position.occupancy(Color::Black);
    assert_eq!(white.or(black), position.occupancy_both());
    assert!(!white.intersects(black));
    assert_eq!(position.pieces(Piece::WhiteKing).popcount(), 1);
    assert_eq!(position.pieces(Piece::BlackKing).popcount(), 1);
}

#[test]
fn test_illegal_move_restores_every_field() {
    // The bishop on e2 is pinned against the king by the rook on e5
    let mut position = position_from("4k3/8/8/4r3/8/8/4B3/4K3 w - - 3 20");
    let snapshot = position.state();

    let mv = position.parse_move("e2d3").unwrap();
    assert!(!position.make_move(mv, false));
    assert_eq!(position.state(), snapshot);
    assert_eq!(position.to_fen(), "4k3/8/8/4r3/8/8/4B3/4K3 w - - 3 20");
}

#[test]
fn test_captures_only_rejects_quiet_moves() {
    let mut position = Position::new();
    let snapshot = position.state();
    let mv = position.parse_move("e2e4").unwrap();
    assert!(!position.make_move(mv, true));
    assert_eq!(position.state(), snapshot);
}

#[test]
fn test_captures_only_allows_captures() {
    let mut position = position_from(
        "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2",
    );
    let mv = position.parse_move("e4d5").unwrap();
    assert!(position.make_move(mv, true));
    assert_eq!(position.piece_on(Square::from_file_rank(3, 4)), Some(Piece::WhitePawn));
}

#[test]
fn test_en_passant_removes_the_right_pawn() {
    let mut position = Position::new();
    play(&mut position, &["e2e4", "a7a6", "e4e5", "f7f5"]);
    assert_eq!(
        position.en_passant_square(),
        Some(Square::from_file_rank(5, 5))
    );

    play(&mut position, &["e5f6"]);
    // The f5 pawn is gone, the white pawn sits on f6
    assert_eq!(position.piece_on(Square::from_file_rank(5, 4)), None);
    assert_eq!(
        position.piece_on(Square::from_file_rank(5, 5)),
        Some(Piece::WhitePawn)
    );
    assert_eq!(position.key(), position.generate_key());
}

#[test]
fn test_double_push_sets_en_passant_square() {
    let mut position = Position::new();
    play(&mut position, &["e2e4"]);
    assert_eq!(
        position.en_passant_square(),
        Some(Square::from_file_rank(4, 2))
    );
    play(&mut position, &["g8f6"]);
    assert_eq!(position.en_passant_square(), None);
}

#[test]
fn test_castling_moves_the_rook_and_clears_rights() {
    let mut position = position_from("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    play(&mut position, &["e1g1"]);
    assert_eq!(position.piece_on(Square::G1), Some(Piece::WhiteKing));
    assert_eq!(position.piece_on(Square::F1), Some(Piece::WhiteRook));
    assert_eq!(position.piece_on(Square::H1), None);
    assert!(position.to_fen().contains(" kq "));
    assert_eq!(position.key(), position.generate_key());

    play(&mut position, &["e8c8"]);
    assert_eq!(position.piece_on(Square::C8), Some(Piece::BlackKing));
    assert_eq!(position.piece_on(Square::D8), Some(Piece::BlackRook));
    assert!(position.to_fen().contains(" - "));
}

#[test]
fn test_rook_capture_clears_opponent_castling_right() {
    let mut position = position_from("r3k2r/8/8/8/8/8/1B6/R3K2R w KQkq - 0 1");
    // Bishop takes the h8 rook: black loses the kingside right
    play(&mut position, &["b2h8"]);
    assert!(position.to_fen().contains(" KQq "));
    assert_eq!(position.key(), position.generate_key());
}

#[test]
fn test_promotion_replaces_the_pawn() {
    let mut position = position_from("8/P6k/8/8/8/8/8/K7 w - - 0 1");
    play(&mut position, &["a7a8q"]);
    assert_eq!(position.piece_on(Square::A8), Some(Piece::WhiteQueen));
    assert!(position.pieces(Piece::WhitePawn).is_empty());
    assert_eq!(position.key(), position.generate_key());
}

#[test]
fn test_underpromotion_with_capture() {
    let mut position = position_from("1n5k/P7/8/8/8/8/8/K7 w - - 0 1");
    play(&mut position, &["a7b8n"]);
    assert_eq!(position.piece_on(Square::B8), Some(Piece::WhiteKnight));
    assert!(position.pieces(Piece::BlackKnight).is_empty());
    assert_eq!(position.key(), position.generate_key());
}

#[test]
fn test_halfmove_clock_resets_on_pawn_move_and_capture() {
    let mut position = Position::new();
    play(&mut position, &["g1f3"]);
    assert_eq!(position.halfmove_clock(), 1);
    play(&mut position, &["g8f6"]);
    assert_eq!(position.halfmove_clock(), 2);
    play(&mut position, &["e2e4"]);
    assert_eq!(position.halfmove_clock(), 0);
    play(&mut position, &["f6e4"]);
    assert_eq!(position.halfmove_clock(), 0);
}

#[test]
fn test_null_move_flips_side_and_clears_en_passant() {
    let mut position = Position::new();
    play(&mut position, &["e2e4"]);
    let snapshot = position.state();

    position.make_null_move();
    assert_eq!(position.side_to_move(), Color::White);
    assert_eq!(position.en_passant_square(), None);
    assert_eq!(position.key(), position.generate_key());

    position.set_state(snapshot);
    assert_eq!(position.key(), position.generate_key());
    assert_eq!(position.side_to_move(), Color::Black);
}

#[test]
fn test_moving_into_check_is_illegal() {
    let mut position = position_from("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1");

    // The rook on e2 covers d2 and f2
    let mv = position.parse_move("e1d2").unwrap();
    assert!(!position.make_move(mv, false));
    let mv = position.parse_move("e1f2").unwrap();
    assert!(!position.make_move(mv, false));

    // Capturing the rook is fine
    let mv = position.parse_move("e1e2").unwrap();
    assert!(position.make_move(mv, false));
    assert_eq!(position.pieces(Piece::BlackRook).popcount(), 0);
}
