//! Zobrist hashing keys.
//!
//! One random 64-bit key per (piece, square), per en-passant square, per
//! castling-rights mask and one for the side to move. The position hash is
//! the XOR of the keys for everything present, maintained incrementally by
//! make-move and recomputable from scratch with `Position::generate_key`.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::{Piece, Square};

// Fixed seed: hashes are stable from run to run
const ZOBRIST_SEED: u64 = 0x9E3779B97F4A7C15;

pub struct ZobristKeys {
    pieces: [[u64; 64]; 12],
    en_passant: [u64; 64],
    castling: [u64; 16],
    side: u64,
}

pub static KEYS: Lazy<ZobristKeys> = Lazy::new(|| {
    let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
    let mut pieces = [[0u64; 64]; 12];
    for piece_keys in &mut pieces {
        for key in piece_keys.iter_mut() {
            *key = rng.gen();
        }
    }
    let mut en_passant = [0u64; 64];
    for key in &mut en_passant {
        *key = rng.gen();
    }
    let mut castling = [0u64; 16];
    for key in &mut castling {
        *key = rng.gen();
    }
    ZobristKeys {
        pieces,
        en_passant,
        castling,
        side: rng.gen(),
    }
});

/// Force key construction
pub fn init() {
    Lazy::force(&KEYS);
}

impl ZobristKeys {
    #[inline]
    #[must_use]
    pub fn piece(&self, piece: Piece, sq: Square) -> u64 {
        self.pieces[piece.index()][sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn en_passant(&self, sq: Square) -> u64 {
        self.en_passant[sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn castling(&self, rights: u8) -> u64 {
        self.castling[rights as usize]
    }

    #[inline]
    #[must_use]
    pub fn side(&self) -> u64 {
        self.side
    }
}
