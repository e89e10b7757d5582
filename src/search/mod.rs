//! Iterative-deepening alpha-beta search.
//!
//! The engine runs negamax with a transposition table, quiescence,
//! null-move pruning, principal variation search with late move
//! reductions, killer/history move ordering and aspiration windows.
//! Draws by repetition and the fifty-move rule are detected inside the
//! tree. Cancellation is cooperative: the stop flag is polled every
//! `CHECKUP_FREQUENCY` nodes and at iteration boundaries.

pub mod constants;
mod move_order;
mod negamax;

#[cfg(test)]
mod tests;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::board::{Color, Move, Position};
use crate::tt::TranspositionTable;

use constants::{
    ASPIRATION_WINDOW, CHECKMATE, CHECKMATE_WINDOW, DEFAULT_MOVES_TO_GO, INFINITY, MAX_DEPTH,
    NUM_KILLER_MOVES, TIME_BUFFER, UNKNOWN_SCORE,
};

/// A principal variation: the engine's expected line of play
#[derive(Clone)]
pub struct PvLine {
    pub(crate) moves: [Move; MAX_DEPTH],
    pub(crate) count: usize,
}

impl PvLine {
    #[must_use]
    pub fn new() -> Self {
        PvLine {
            moves: [Move::NULL; MAX_DEPTH],
            count: 0,
        }
    }

    /// The first move of the line, if any
    #[must_use]
    pub fn first(&self) -> Option<Move> {
        (!self.moves[0].is_null()).then_some(self.moves[0])
    }

    /// Set this line to `mv` followed by the child line
    pub(crate) fn extend(&mut self, mv: Move, child: &PvLine) {
        self.moves[0] = mv;
        let tail = child.count.min(MAX_DEPTH - 1);
        for i in 0..tail {
            self.moves[i + 1] = child.moves[i];
        }
        self.count = tail + 1;
    }
}

impl Default for PvLine {
    fn default() -> Self {
        PvLine::new()
    }
}

impl fmt::Display for PvLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, mv) in self.moves[..self.count].iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{mv}")?;
        }
        Ok(())
    }
}

/// Limits parsed from a UCI `go` command
#[derive(Clone, Debug, Default)]
pub struct SearchLimits {
    /// Fixed depth limit
    pub depth: Option<i32>,
    /// Node budget; 0 means unlimited
    pub max_nodes: u64,
    /// Absolute time for this move in milliseconds
    pub move_time: Option<u64>,
    pub white_time: u64,
    pub black_time: u64,
    pub white_inc: u64,
    pub black_inc: u64,
    /// Moves remaining in the time control; 0 means unknown
    pub moves_to_go: u64,
    /// When set, the engine budgets its own clock time
    pub engine_decides: bool,
}

/// The search worker. One instance runs one search to completion.
pub struct SearchEngine {
    pub(crate) nodes: u64,
    pub(crate) ply: usize,
    score: i32,
    // Indexed by the iterative-deepening depth, one extra row so the
    // deepest iteration stays in bounds
    pub(crate) killer_moves: [[Move; NUM_KILLER_MOVES]; MAX_DEPTH + 1],
    pub(crate) history_moves: [[i32; 64]; 12],
    pub(crate) tt_move: Move,
    pub(crate) pv_line: PvLine,
    pub(crate) current_depth: i32,
    limits: SearchLimits,
    pub(crate) stop_search: bool,
    external_stop: Arc<AtomicBool>,
    start_time: Instant,
    end_time: Option<Instant>,
}

impl SearchEngine {
    #[must_use]
    pub fn new(external_stop: Arc<AtomicBool>, limits: SearchLimits) -> Self {
        SearchEngine {
            nodes: 0,
            ply: 0,
            score: UNKNOWN_SCORE,
            killer_moves: [[Move::NULL; NUM_KILLER_MOVES]; MAX_DEPTH + 1],
            history_moves: [[0; 64]; 12],
            tt_move: Move::NULL,
            pv_line: PvLine::new(),
            current_depth: 0,
            limits,
            stop_search: false,
            external_stop,
            start_time: Instant::now(),
            end_time: None,
        }
    }

    /// The best move found by the last `search` call
    #[must_use]
    pub fn best_move(&self) -> Option<Move> {
        self.pv_line.first()
    }

    /// The score of the last completed iteration
    #[must_use]
    pub fn score(&self) -> i32 {
        self.score
    }

    /// Nodes visited by the last search
    #[must_use]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Run the search, printing UCI `info` lines per completed depth and
    /// a final `bestmove` line.
    pub fn search(&mut self, position: &mut Position, tt: &mut TranspositionTable) {
        self.start_time = Instant::now();
        self.plan_time(position);

        self.killer_moves = [[Move::NULL; NUM_KILLER_MOVES]; MAX_DEPTH + 1];
        self.history_moves = [[0; 64]; 12];
        self.nodes = 0;
        self.ply = 0;
        self.current_depth = 1;
        self.score = UNKNOWN_SCORE;
        let mut alpha = -INFINITY;
        let mut beta = INFINITY;
        let mut printed_info;

        self.check_stop();

        // Iterative deepening; always completes at least one iteration
        loop {
            let mut new_pv = PvLine::new();
            printed_info = false;

            // Aspiration window around the previous score; redo with the
            // full window when the result falls outside
            let mut temp_score =
                self.negamax(alpha, beta, self.current_depth, position, tt, &mut new_pv, false);
            if temp_score <= alpha || temp_score >= beta {
                temp_score = self.negamax(
                    -INFINITY,
                    INFINITY,
                    self.current_depth,
                    position,
                    tt,
                    &mut new_pv,
                    false,
                );
            }

            if self.stop_search {
                // A partial iteration is only trusted when it confirms the
                // previous best move or strictly improves on its score;
                // otherwise the reported depth shrinks back.
                if new_pv.moves[0] == self.pv_line.moves[0] || temp_score > self.score {
                    self.score = temp_score;
                    self.pv_line = new_pv;
                } else {
                    self.current_depth -= 1;
                }
                break;
            }

            self.pv_line = new_pv;
            self.score = temp_score;

            alpha = temp_score - ASPIRATION_WINDOW;
            beta = temp_score + ASPIRATION_WINDOW;

            self.print_search_info(tt);
            printed_info = true;

            if self.is_mate_score() {
                self.stop_search = true;
                break;
            }

            self.current_depth += 1;
            self.check_stop();
            if self.stop_search {
                break;
            }
        }

        if !printed_info {
            self.print_search_info(tt);
        }

        match self.best_move() {
            Some(mv) => println!("bestmove {mv}"),
            None => println!("bestmove 0000"),
        }
    }

    /// Turn clock information into a deadline when the engine manages its
    /// own time
    fn plan_time(&mut self, position: &Position) {
        if let Some(move_time) = self.limits.move_time {
            self.end_time = Some(self.start_time + Duration::from_millis(move_time));
        }
        if !self.limits.engine_decides {
            return;
        }
        let (remaining, increment) = match position.side_to_move() {
            Color::White => (self.limits.white_time, self.limits.white_inc),
            Color::Black => (self.limits.black_time, self.limits.black_inc),
        };
        if remaining == 0 {
            self.limits.engine_decides = false;
        } else if remaining < TIME_BUFFER {
            // Nearly out of time: move instantly
            self.limits.engine_decides = false;
            self.limits.depth = Some(1);
        } else {
            let remaining = remaining - TIME_BUFFER;
            let moves_to_go = if self.limits.moves_to_go == 0 {
                DEFAULT_MOVES_TO_GO
            } else {
                self.limits.moves_to_go
            };
            self.end_time = Some(
                self.start_time + Duration::from_millis(remaining / moves_to_go + increment),
            );
        }
    }

    fn should_stop(&self) -> bool {
        if self.external_stop.load(Ordering::Relaxed) {
            return true;
        }
        if self.limits.max_nodes != 0 && self.nodes >= self.limits.max_nodes {
            return true;
        }
        if let Some(depth) = self.limits.depth {
            if self.current_depth > depth {
                return true;
            }
        }
        if let Some(end_time) = self.end_time {
            if Instant::now() >= end_time {
                return true;
            }
        }
        self.current_depth > MAX_DEPTH as i32
    }

    /// Refresh the stop flag; called every `CHECKUP_FREQUENCY` nodes and
    /// at iteration boundaries
    pub(crate) fn check_stop(&mut self) {
        self.stop_search = self.should_stop();
    }

    fn is_mate_score(&self) -> bool {
        (self.score > CHECKMATE && self.score < CHECKMATE_WINDOW)
            || (self.score > -CHECKMATE_WINDOW && self.score < -CHECKMATE)
    }

    fn print_search_info(&self, tt: &TranspositionTable) {
        let elapsed = (self.start_time.elapsed().as_millis() as u64).max(1);
        let nps = self.nodes * 1000 / elapsed;

        let score = if self.score > CHECKMATE && self.score < CHECKMATE_WINDOW {
            format!("mate {}", (self.score - CHECKMATE + 1) / -2)
        } else if self.score > -CHECKMATE_WINDOW && self.score < -CHECKMATE {
            format!("mate {}", (self.score + CHECKMATE - 1).abs() / 2)
        } else {
            format!("cp {}", self.score)
        };

        println!(
            "info score {score} depth {} nodes {} time {elapsed} nps {nps} hashfull {} pv {}",
            self.current_depth,
            self.nodes,
            tt.fill_permille(),
            self.pv_line
        );
    }
}
