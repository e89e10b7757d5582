//! The negamax and quiescence recursions.

use crate::board::{evaluate, Move, MoveList, Position};
use crate::tt::{TTFlag, TranspositionTable};

use super::constants::{
    CHECKMATE, CHECKUP_FREQUENCY, DRAW, ENDGAME_PIECE_COUNT, LMR_REDUCTION, LMR_REDUCTION_LIMIT,
    MAX_DEPTH, MIN_FULL_DEPTH_SEARCHES, NULL_MOVE_REDUCTION,
};
use super::{PvLine, SearchEngine};

impl SearchEngine {
    /// Alpha-beta negamax. `is_null` marks the child of a null move so
    /// null-move pruning is never applied twice in a row.
    #[allow(clippy::too_many_lines, clippy::too_many_arguments)]
    pub(crate) fn negamax(
        &mut self,
        mut alpha: i32,
        beta: i32,
        depth: i32,
        position: &mut Position,
        tt: &mut TranspositionTable,
        pv_line: &mut PvLine,
        is_null: bool,
    ) -> i32 {
        if self.nodes % CHECKUP_FREQUENCY == 0 {
            self.check_stop();
        }
        self.nodes += 1;

        // Transposition table cutoffs and move hint
        let entry = tt.get(position.key());
        if entry.key == position.key() && entry.depth >= depth {
            if entry.flag == TTFlag::Alpha && entry.score <= alpha {
                return alpha;
            } else if entry.flag == TTFlag::Beta && entry.score >= beta {
                return beta;
            }
            self.tt_move = entry.best_move;
        } else {
            self.tt_move = Move::NULL;
        }

        if self.ply > 0 && position.repetition_ring().contains(position.key()) {
            return DRAW;
        }
        if position.halfmove_clock() >= 100 {
            return DRAW;
        }

        // Check extension
        let in_check = position.in_check();
        let depth = if in_check { depth + 1 } else { depth };

        if self.ply > MAX_DEPTH - 1 || depth <= 0 {
            pv_line.count = 0;
            let score = self.quiescence(alpha, beta, position);
            tt.store(position.key(), depth, TTFlag::Exact, score, Move::NULL);
            return score;
        }

        // Null-move pruning: give the opponent a free move and prune when
        // the reduced search still fails high. Not applied in check, in
        // null children, or with little material left.
        if depth > 1 + NULL_MOVE_REDUCTION
            && !in_check
            && !is_null
            && position.non_pawn_king_count() > ENDGAME_PIECE_COUNT
        {
            let snapshot = position.state();
            self.ply += 1;
            position.repetition_ring_mut().push(snapshot.key);
            position.make_null_move();

            let score = -self.negamax(
                -beta,
                -beta + 1,
                depth - 1 - NULL_MOVE_REDUCTION,
                position,
                tt,
                pv_line,
                true,
            );

            self.ply -= 1;
            position.repetition_ring_mut().pop();
            position.set_state(snapshot);

            if self.stop_search {
                return alpha;
            }
            if score >= beta {
                tt.store(position.key(), depth, TTFlag::Beta, beta, Move::NULL);
                return beta;
            }
        }

        let mut moves = MoveList::new();
        position.generate_moves(&mut moves);
        let sorted = self.sort_moves(&moves, position);

        let mut tt_flag = TTFlag::Alpha;
        let mut legal_moves = 0;
        let mut moves_searched = 0;
        let mut child_pv = PvLine::new();

        for scored in sorted.iter() {
            let mv = scored.mv;
            let snapshot = position.state();
            self.ply += 1;
            position.repetition_ring_mut().push(snapshot.key);

            if !position.make_move(mv, false) {
                self.ply -= 1;
                position.repetition_ring_mut().pop();
                continue;
            }
            legal_moves += 1;

            let score = if moves_searched < MIN_FULL_DEPTH_SEARCHES {
                // The first moves get the full window at full depth
                -self.negamax(-beta, -alpha, depth - 1, position, tt, &mut child_pv, false)
            } else {
                // Principal variation search with late move reductions
                let mut score = if depth >= LMR_REDUCTION_LIMIT && Self::can_reduce(mv, position) {
                    -self.negamax(
                        -alpha - 1,
                        -alpha,
                        depth - 1 - LMR_REDUCTION,
                        position,
                        tt,
                        &mut child_pv,
                        false,
                    )
                } else {
                    alpha + 1
                };
                if score > alpha {
                    score = -self.negamax(
                        -alpha - 1,
                        -alpha,
                        depth - 1,
                        position,
                        tt,
                        &mut child_pv,
                        false,
                    );
                    if score > alpha && score < beta {
                        score = -self.negamax(
                            -beta,
                            -alpha,
                            depth - 1,
                            position,
                            tt,
                            &mut child_pv,
                            false,
                        );
                    }
                }
                score
            };

            self.ply -= 1;
            position.repetition_ring_mut().pop();
            position.set_state(snapshot);

            if self.stop_search {
                return alpha;
            }
            moves_searched += 1;

            if score >= beta {
                if mv.is_quiet() {
                    self.store_killer(mv);
                }
                tt.store(position.key(), depth, TTFlag::Beta, beta, mv);
                return beta;
            }

            if score > alpha {
                if mv.is_quiet() {
                    self.history_moves[mv.piece().index()][mv.target().index()] += depth * depth;
                }
                pv_line.extend(mv, &child_pv);
                tt_flag = TTFlag::Exact;
                alpha = score;
            }
        }

        if legal_moves == 0 {
            // Mate distance from the root makes closer mates score higher
            return if in_check {
                CHECKMATE + self.ply as i32
            } else {
                DRAW
            };
        }

        tt.store(position.key(), depth, tt_flag, alpha, pv_line.moves[0]);
        alpha
    }

    /// Capture-only tail search past the depth horizon
    pub(crate) fn quiescence(&mut self, mut alpha: i32, beta: i32, position: &mut Position) -> i32 {
        if self.nodes % CHECKUP_FREQUENCY == 0 {
            self.check_stop();
        }
        self.nodes += 1;

        if self.ply > 0 && position.repetition_ring().contains(position.key()) {
            return DRAW;
        }
        if position.halfmove_clock() >= 100 {
            return DRAW;
        }

        // Stand pat: the static eval bounds the score from below
        let evaluation = evaluate(position);
        if evaluation >= beta {
            return beta;
        }
        if evaluation > alpha {
            alpha = evaluation;
        }

        let mut moves = MoveList::new();
        position.generate_moves(&mut moves);
        let sorted = self.sort_moves(&moves, position);

        for scored in sorted.iter() {
            let mv = scored.mv;
            let snapshot = position.state();
            self.ply += 1;
            position.repetition_ring_mut().push(snapshot.key);

            // Captures only; the position filters everything else
            if !position.make_move(mv, true) {
                self.ply -= 1;
                position.repetition_ring_mut().pop();
                continue;
            }

            let score = -self.quiescence(-beta, -alpha, position);

            self.ply -= 1;
            position.repetition_ring_mut().pop();
            position.set_state(snapshot);

            if self.stop_search {
                return alpha;
            }
            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }
}
