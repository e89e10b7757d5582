//! Search behavior tests.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::board::Position;
use crate::tt::TranspositionTable;
use crate::uci::apply_position;

use super::constants::{DRAW, INFINITY};
use super::{PvLine, SearchEngine, SearchLimits};

fn engine_with_depth(depth: i32) -> SearchEngine {
    let stop = Arc::new(AtomicBool::new(false));
    let limits = SearchLimits {
        depth: Some(depth),
        ..SearchLimits::default()
    };
    SearchEngine::new(stop, limits)
}

fn tokens(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}

#[test]
fn test_reentering_a_repetition_scores_draw() {
    let mut position = Position::new();
    apply_position(
        &mut position,
        &tokens("startpos moves g1f3 g8f6 f3g1 f6g8 g1f3 g8f6 f3g1 f6g8"),
    )
    .unwrap();

    // Step into the repeated position the way the search does: push the
    // parent key, make the move, recurse at ply 1.
    let mut engine = engine_with_depth(4);
    engine.current_depth = 2;
    let mv = position.parse_move("g1f3").unwrap();
    let snapshot = position.state();
    engine.ply = 1;
    position.repetition_ring_mut().push(snapshot.key);
    assert!(position.make_move(mv, false));

    let mut tt = TranspositionTable::new(1);
    let mut pv = PvLine::new();
    let score = engine.negamax(-INFINITY, INFINITY, 2, &mut position, &mut tt, &mut pv, false);
    assert_eq!(score, DRAW);
}

#[test]
fn test_hundred_halfmoves_is_a_draw_at_every_depth() {
    for depth in 1..=4 {
        let mut position = Position::new();
        // White is a rook up, but the fifty-move rule trumps material
        position.set_from_fen("R6k/8/8/8/8/8/8/7K w - - 100 1").unwrap();
        let mut tt = TranspositionTable::new(1);
        let mut engine = engine_with_depth(depth);
        engine.search(&mut position, &mut tt);
        assert_eq!(engine.score(), DRAW, "depth {depth}");
    }
}

#[test]
fn test_depth_limited_search_finishes() {
    let mut position = Position::new();
    let mut tt = TranspositionTable::new(8);
    let mut engine = engine_with_depth(3);
    engine.search(&mut position, &mut tt);
    assert!(engine.best_move().is_some());
    assert!(engine.nodes() > 0);
}

#[test]
fn test_node_limit_stops_the_search() {
    let mut position = Position::new();
    let mut tt = TranspositionTable::new(8);
    let stop = Arc::new(AtomicBool::new(false));
    let limits = SearchLimits {
        max_nodes: 5_000,
        ..SearchLimits::default()
    };
    let mut engine = SearchEngine::new(stop, limits);
    engine.search(&mut position, &mut tt);
    // The limit is only polled every few thousand nodes, so allow slack
    assert!(engine.nodes() < 100_000);
}

#[test]
fn test_preset_stop_flag_returns_immediately() {
    let mut position = Position::new();
    let mut tt = TranspositionTable::new(8);
    let stop = Arc::new(AtomicBool::new(true));
    let mut engine = SearchEngine::new(stop, SearchLimits::default());
    engine.search(&mut position, &mut tt);
    assert!(engine.nodes() < 10_000);
}

#[test]
fn test_search_leaves_position_intact() {
    let mut position = Position::new();
    apply_position(&mut position, &tokens("startpos moves e2e4 c7c5")).unwrap();
    let fen = position.to_fen();
    let key = position.key();

    let mut tt = TranspositionTable::new(8);
    let mut engine = engine_with_depth(5);
    engine.search(&mut position, &mut tt);

    assert_eq!(position.to_fen(), fen);
    assert_eq!(position.key(), key);
}

#[test]
fn test_deeper_search_reuses_the_tt() {
    let mut position = Position::new();
    let mut tt = TranspositionTable::new(8);
    let mut engine = engine_with_depth(6);
    engine.search(&mut position, &mut tt);
    assert!(tt.fill_permille() > 0);
}
