//! Ferrum is a UCI chess engine.
//!
//! The engine is built around:
//! - Bitboard position representation with magic-bitboard slider attacks
//! - Pseudo-legal move generation with make-move legality filtering
//! - Iterative-deepening negamax with a transposition table, quiescence,
//!   null-move pruning, late move reductions and aspiration windows
//! - A tapered midgame/endgame evaluation
//!
//! # Quick Start
//!
//! ```
//! use ferrum::board::Position;
//! use ferrum::search::{SearchEngine, SearchLimits};
//! use ferrum::sync::StopFlag;
//! use ferrum::tt::TranspositionTable;
//!
//! let mut position = Position::new();
//! let mut tt = TranspositionTable::new(16);
//!
//! let stop = StopFlag::new();
//! let limits = SearchLimits {
//!     depth: Some(4),
//!     ..SearchLimits::default()
//! };
//!
//! let mut engine = SearchEngine::new(stop.as_arc(), limits);
//! engine.search(&mut position, &mut tt);
//! assert!(engine.best_move().is_some());
//! ```
//!
//! # Positions
//!
//! ```
//! use ferrum::board::Position;
//!
//! let mut position = Position::new();
//! position
//!     .set_from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
//!     .unwrap();
//! assert_eq!(
//!     position.to_fen(),
//!     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
//! );
//! ```
//!
//! # Features
//!
//! - `serde` - Enable serialization for `Piece`, `Color`, `Square`, `Move`,
//!   and `CastlingRights`

// Enable pedantic lints with sensible domain-specific exceptions
#![warn(clippy::pedantic)]
// Bitboard hex literals are clearer without separators (bit patterns visible)
#![allow(clippy::unreadable_literal)]
// Chess engines have intentionally similar names (eval_mg/eval_eg, etc.)
#![allow(clippy::similar_names)]
// Index casts are ubiquitous and safe in chess (board indices, square indices)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
// Large arrays are needed for move lists and attack tables
#![allow(clippy::large_stack_arrays)]
// Module-level documentation is sufficient for this codebase
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod board;
pub mod repetition;
pub mod search;
pub mod sync;
pub mod tt;
pub mod uci;
pub mod zobrist;
