//! Property-based tests over random move sequences.

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use rand::prelude::*;
use rand::Rng;

use crate::board::{Color, MoveList, Piece, Position};

fn assert_invariants(position: &Position) -> Result<(), TestCaseError> {
    // Incremental key matches a from-scratch recomputation
    prop_assert_eq!(position.key(), position.generate_key());

    // Occupancies partition correctly
    let white = position.occupancy(Color::White);
    let black = position.occupancy(Color::Black);
    prop_assert_eq!(white.or(black), position.occupancy_both());
    prop_assert!(!white.intersects(black));

    // Piece bitboards are pairwise disjoint
    for a in 0..Piece::ALL.len() {
        for b in (a + 1)..Piece::ALL.len() {
            prop_assert!(!position
                .pieces(Piece::ALL[a])
                .intersects(position.pieces(Piece::ALL[b])));
        }
    }

    // Exactly one king per color
    prop_assert_eq!(position.pieces(Piece::WhiteKing).popcount(), 1);
    prop_assert_eq!(position.pieces(Piece::BlackKing).popcount(), 1);
    Ok(())
}

proptest! {
    /// Random legal walks preserve every position invariant
    #[test]
    fn prop_random_walk_preserves_invariants(seed in any::<u64>(), length in 1..60usize) {
        let mut position = Position::new();
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..length {
            let mut moves = MoveList::new();
            position.generate_moves(&mut moves);

            // Collect the legal subset, restoring after each probe
            let mut legal = Vec::new();
            for &mv in &moves {
                let snapshot = position.state();
                if position.make_move(mv, false) {
                    position.set_state(snapshot);
                    legal.push(mv);
                }
            }
            if legal.is_empty() {
                break;
            }

            let mv = legal[rng.gen_range(0..legal.len())];
            prop_assert!(position.make_move(mv, false));
            assert_invariants(&position)?;
        }
    }

    /// A rejected move leaves the state exactly as the snapshot had it
    #[test]
    fn prop_illegal_moves_restore_snapshot(seed in any::<u64>(), length in 1..40usize) {
        let mut position = Position::new();
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..length {
            let mut moves = MoveList::new();
            position.generate_moves(&mut moves);
            if moves.is_empty() {
                break;
            }

            let snapshot = position.state();
            let mv = moves[rng.gen_range(0..moves.len())];
            if !position.make_move(mv, false) {
                prop_assert_eq!(position.state(), snapshot);
            }
        }
    }

    /// FEN emission and parsing are inverses along random games
    #[test]
    fn prop_fen_round_trip(seed in any::<u64>(), length in 1..40usize) {
        let mut position = Position::new();
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..length {
            let mut moves = MoveList::new();
            position.generate_moves(&mut moves);
            let mut shuffled: Vec<_> = moves.iter().copied().collect();
            shuffled.shuffle(&mut rng);

            let Some(&mv) = shuffled.iter().find(|&&mv| {
                let snapshot = position.state();
                let ok = position.make_move(mv, false);
                if ok {
                    position.set_state(snapshot);
                }
                ok
            }) else {
                break;
            };
            position.make_move(mv, false);

            let fen = position.to_fen();
            let mut reparsed = Position::new();
            prop_assert!(reparsed.set_from_fen(&fen).is_ok());
            prop_assert_eq!(reparsed.to_fen(), fen);
            prop_assert_eq!(reparsed.key(), position.key());
        }
    }
}
