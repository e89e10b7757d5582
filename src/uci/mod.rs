//! Universal Chess Interface (UCI) protocol loop.
//!
//! The command reader owns the engine state behind a mutex and runs on
//! the foreground thread. Each `go` spawns a single search worker that
//! locks the state for the whole search; every command that mutates state
//! first sets the stop flag and joins the worker, so the two phases never
//! overlap.

pub mod command;

use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use parking_lot::Mutex;

use crate::board::{evaluate, perft, perft_divide, Color, FenError, Position};
use crate::search::{SearchEngine, SearchLimits};
use crate::sync::StopFlag;
use crate::tt::TranspositionTable;

use command::{parse_uci_command, GoParams, UciCommand};

/// Default transposition table size in megabytes
pub const DEFAULT_TT_MB: usize = 128;

const ENGINE_NAME: &str = "Ferrum";
const ENGINE_AUTHOR: &str = "the Ferrum developers";

/// Error type for position command handling
#[derive(Debug, Clone)]
pub enum UciError {
    /// Invalid FEN string in a position command
    InvalidFen(FenError),
}

impl fmt::Display for UciError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UciError::InvalidFen(e) => write!(f, "Invalid FEN: {e}"),
        }
    }
}

impl std::error::Error for UciError {}

impl From<FenError> for UciError {
    fn from(e: FenError) -> Self {
        UciError::InvalidFen(e)
    }
}

/// Engine state shared between the command reader and the search worker.
/// The worker holds the lock for the duration of a search; the reader
/// only locks after joining the worker.
struct EngineShared {
    position: Position,
    tt: TranspositionTable,
}

/// The UCI engine front end
pub struct Uci {
    shared: Arc<Mutex<EngineShared>>,
    stop: StopFlag,
    worker: Option<JoinHandle<()>>,
    seen_ucinewgame: bool,
}

impl Uci {
    #[must_use]
    pub fn new() -> Self {
        crate::board::init_tables();
        Uci {
            shared: Arc::new(Mutex::new(EngineShared {
                position: Position::new(),
                tt: TranspositionTable::new(DEFAULT_TT_MB),
            })),
            stop: StopFlag::new(),
            worker: None,
            seen_ucinewgame: false,
        }
    }

    /// Read commands from standard input until `quit`
    pub fn run(&mut self) {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let Some(cmd) = parse_uci_command(&line) else {
                continue;
            };
            if matches!(cmd, UciCommand::Quit) {
                self.stop_worker();
                break;
            }
            self.process(cmd);
            let _ = io::stdout().flush();
        }
    }

    fn process(&mut self, cmd: UciCommand) {
        match cmd {
            UciCommand::Uci => {
                println!("id name {ENGINE_NAME}");
                println!("id author {ENGINE_AUTHOR}");
                println!();
                println!("option name Hash type spin default {DEFAULT_TT_MB} min 1 max 1024");
                println!("uciok");
            }
            UciCommand::IsReady => println!("readyok"),
            UciCommand::UciNewGame => {
                self.seen_ucinewgame = true;
                self.new_game();
            }
            UciCommand::Position(tokens) => {
                self.stop_worker();
                if !self.seen_ucinewgame {
                    self.new_game();
                }
                let mut shared = self.shared.lock();
                if let Err(e) = apply_position(&mut shared.position, &tokens) {
                    println!("Error: {e}");
                }
            }
            UciCommand::Go(params) => self.go(&params),
            UciCommand::Stop => self.stop_worker(),
            UciCommand::SetOption { name, value } => {
                self.stop_worker();
                if name == "Hash" {
                    match value.parse::<usize>() {
                        Ok(mb) => self.shared.lock().tt.resize(mb.clamp(1, 1024)),
                        Err(_) => println!("Error: invalid Hash value '{value}'"),
                    }
                }
            }
            UciCommand::Display => {
                self.stop_worker();
                println!("{}", self.shared.lock().position);
            }
            UciCommand::Eval => {
                self.stop_worker();
                let shared = self.shared.lock();
                let score = evaluate(&shared.position);
                // Reported from White's point of view
                match shared.position.side_to_move() {
                    Color::White => println!("{score}"),
                    Color::Black => println!("{}", -score),
                }
            }
            UciCommand::Perft(tokens) => {
                self.stop_worker();
                self.perft_command(&tokens);
            }
            UciCommand::Unknown(text) => println!("Unknown command: {text}"),
            UciCommand::Quit => {}
        }
    }

    fn new_game(&mut self) {
        self.stop_worker();
        let mut shared = self.shared.lock();
        shared.position.reset();
        shared.tt.clear();
    }

    fn go(&mut self, params: &GoParams) {
        self.stop_worker();
        self.stop.reset();

        let limits = limits_from_go(params);
        let shared = Arc::clone(&self.shared);
        let stop = self.stop.as_arc();

        let handle = thread::Builder::new()
            .name("search".to_string())
            .spawn(move || {
                let mut guard = shared.lock();
                let EngineShared { position, tt } = &mut *guard;
                let mut engine = SearchEngine::new(stop, limits);
                engine.search(position, tt);
            })
            .expect("failed to spawn search thread");
        self.worker = Some(handle);
    }

    /// Set the stop flag and join the worker before touching shared state
    fn stop_worker(&mut self) {
        self.stop.stop();
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }

    /// `perft [debug] <depth> [startpos|<FEN>]`
    fn perft_command(&mut self, tokens: &[String]) {
        let mut tokens = tokens;
        let debug = tokens.first().map(String::as_str) == Some("debug");
        if debug {
            tokens = &tokens[1..];
        }

        let Some(depth) = tokens.first().and_then(|t| t.parse::<u32>().ok()) else {
            println!("Invalid depth");
            return;
        };

        let mut shared = self.shared.lock();
        if let Some(setup) = tokens.get(1) {
            let result = if setup == "startpos" {
                apply_position(&mut shared.position, &tokens[1..])
            } else {
                let fen = tokens[1..].join(" ");
                shared.position.set_from_fen(&fen).map_err(UciError::from)
            };
            if let Err(e) = result {
                println!("Error: {e}");
                return;
            }
        }

        if debug {
            let start = Instant::now();
            let counts = perft_divide(&mut shared.position, depth);
            let total: u64 = counts.iter().map(|(_, n)| n).sum();
            for (mv, count) in counts {
                println!("{mv}: Nodes {count}");
            }
            println!(
                "Depth: {depth} Nodes: {total} Time: {}",
                start.elapsed().as_millis()
            );
        } else {
            println!("{}", perft(&mut shared.position, depth));
        }
    }
}

impl Default for Uci {
    fn default() -> Self {
        Uci::new()
    }
}

/// Apply a `position {startpos|fen <FEN>} [moves ...]` body.
///
/// Moves are matched against the generated moves of the running position;
/// an unknown token stops the application. Each applied move pushes the
/// resulting key onto the repetition ring.
pub fn apply_position(position: &mut Position, tokens: &[String]) -> Result<(), UciError> {
    let mut index = match tokens.first().map(String::as_str) {
        Some("startpos") => {
            position.reset();
            1
        }
        Some("fen") => {
            let end = (1 + 6).min(tokens.len());
            let fen = tokens[1..end].join(" ");
            position.set_from_fen(&fen)?;
            end
        }
        _ => return Ok(()),
    };

    if tokens.get(index).map(String::as_str) == Some("moves") {
        index += 1;
        while let Some(token) = tokens.get(index) {
            let Ok(mv) = position.parse_move(token) else {
                break;
            };
            position.make_move(mv, false);
            let key = position.key();
            position.repetition_ring_mut().push(key);
            index += 1;
        }
    }
    Ok(())
}

/// Translate `go` parameters into search limits
fn limits_from_go(params: &GoParams) -> SearchLimits {
    let mut limits = SearchLimits::default();
    if params.infinite {
        return limits;
    }

    limits.depth = params.depth;
    limits.max_nodes = params.nodes.unwrap_or(0);

    if let Some(movetime) = params.movetime {
        limits.move_time = Some(movetime);
    } else {
        limits.white_time = params.wtime.unwrap_or(0);
        limits.black_time = params.btime.unwrap_or(0);
        limits.white_inc = params.winc.unwrap_or(0);
        limits.black_inc = params.binc.unwrap_or(0);
        limits.moves_to_go = params.movestogo.unwrap_or(0);
        limits.engine_decides = true;
    }
    limits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(tokens: &[&str]) -> Position {
        let mut position = Position::new();
        let tokens: Vec<String> = tokens.iter().map(|t| (*t).to_string()).collect();
        apply_position(&mut position, &tokens).unwrap();
        position
    }

    #[test]
    fn test_apply_startpos_with_moves() {
        let position = apply(&["startpos", "moves", "e2e4", "e7e5", "g1f3"]);
        assert_eq!(
            position.to_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
        );
    }

    #[test]
    fn test_apply_fen_with_moves() {
        let position = apply(&[
            "fen", "6k1/5ppp/8/8/8/8/5PPP/R5K1", "w", "-", "-", "0", "1", "moves", "a1a8",
        ]);
        assert_eq!(position.to_fen(), "R5k1/5ppp/8/8/8/8/5PPP/6K1 b - - 1 1");
    }

    #[test]
    fn test_apply_stops_at_unknown_move() {
        let position = apply(&["startpos", "moves", "e2e4", "zzz", "e7e5"]);
        assert_eq!(
            position.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn test_apply_pushes_repetition_keys() {
        let position = apply(&["startpos", "moves", "g1f3", "g8f6", "f3g1", "f6g8"]);
        // The starting position has recurred; its key is in the ring
        assert!(position.repetition_ring().contains(position.key()));
    }

    #[test]
    fn test_apply_bad_fen_reports_error() {
        let mut position = Position::new();
        let tokens: Vec<String> = ["fen", "bad", "fen", "string", "-", "0", "1"]
            .iter()
            .map(|t| (*t).to_string())
            .collect();
        assert!(apply_position(&mut position, &tokens).is_err());
    }

    #[test]
    fn test_limits_from_go_clock() {
        let params = GoParams {
            wtime: Some(60_000),
            btime: Some(60_000),
            winc: Some(1000),
            binc: Some(1000),
            ..GoParams::default()
        };
        let limits = limits_from_go(&params);
        assert!(limits.engine_decides);
        assert_eq!(limits.white_time, 60_000);
        assert_eq!(limits.move_time, None);
    }

    #[test]
    fn test_limits_from_go_infinite() {
        let params = GoParams {
            infinite: true,
            wtime: Some(60_000),
            ..GoParams::default()
        };
        let limits = limits_from_go(&params);
        assert!(!limits.engine_decides);
        assert_eq!(limits.depth, None);
        assert_eq!(limits.white_time, 0);
    }

    #[test]
    fn test_limits_from_go_movetime() {
        let params = GoParams {
            movetime: Some(2500),
            ..GoParams::default()
        };
        let limits = limits_from_go(&params);
        assert_eq!(limits.move_time, Some(2500));
        assert!(!limits.engine_decides);
    }
}
