//! Search tuning constants.

/// Maximum search depth in plies
pub const MAX_DEPTH: usize = 128;

/// A value larger than any reachable score
pub const INFINITY: i32 = 50_000;

/// Base of the mate score band; a mate found at ply p scores
/// `CHECKMATE + p` for the side being mated
pub const CHECKMATE: i32 = -49_000;

/// Scores between `CHECKMATE` and this bound encode a mate distance
pub const CHECKMATE_WINDOW: i32 = -48_000;

/// Placeholder for a score that has not been computed
pub const UNKNOWN_SCORE: i32 = 100_000;

/// Score returned for drawn positions
pub const DRAW: i32 = 0;

/// Aspiration window half-width in centipawns
pub const ASPIRATION_WINDOW: i32 = 50;

/// The stop flag is refreshed every this many nodes
pub const CHECKUP_FREQUENCY: u64 = 2048;

/// Depth reduction for the null-move search
pub const NULL_MOVE_REDUCTION: i32 = 2;

/// With at most this many non-pawn/king pieces left, null move is skipped
pub const ENDGAME_PIECE_COUNT: u32 = 6;

/// Number of moves searched with the full window at every node
pub const MIN_FULL_DEPTH_SEARCHES: usize = 2;

/// LMR is only applied at or beyond this depth
pub const LMR_REDUCTION_LIMIT: i32 = 3;

/// Depth reduction applied by LMR
pub const LMR_REDUCTION: i32 = 1;

/// Number of killer-move slots per depth
pub const NUM_KILLER_MOVES: usize = 2;

/// Milliseconds the engine tries to keep on its clock; below this it
/// moves instantly
pub const TIME_BUFFER: u64 = 1000;

/// Assumed moves remaining when the time control does not say
pub const DEFAULT_MOVES_TO_GO: u64 = 60;
