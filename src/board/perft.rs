//! Perft: exact leaf counts used as a move-generator conformance oracle.

use super::state::Position;
use super::types::{Move, MoveList};

/// Count the legal leaf positions at the given depth
#[must_use]
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut moves = MoveList::new();
    position.generate_moves(&mut moves);
    let mut nodes = 0;
    for &mv in &moves {
        let snapshot = position.state();
        if !position.make_move(mv, false) {
            continue;
        }
        nodes += perft(position, depth - 1);
        position.set_state(snapshot);
    }
    nodes
}

/// Perft with a per-root-move breakdown, for debugging divergences
#[must_use]
pub fn perft_divide(position: &mut Position, depth: u32) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let mut moves = MoveList::new();
    position.generate_moves(&mut moves);
    let mut counts = Vec::new();
    for &mv in &moves {
        let snapshot = position.state();
        if !position.make_move(mv, false) {
            continue;
        }
        counts.push((mv, perft(position, depth - 1)));
        position.set_state(snapshot);
    }
    counts
}
