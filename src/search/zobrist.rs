//! Zobrist hashing keys.
//!
//! The key tables are generated once from a fixed seed so hashes are stable
//! across runs; the transposition table relies on that for reproducible
//! searches.

use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::types::{CastlingRights, Color, PieceKind, Square};

const ZOBRIST_SEED: u64 = 0x5eed_c0de_2024_0001;

pub struct ZobristKeys {
    /// Indexed `[color][piece][square]`.
    pub piece_square: [[[u64; 64]; 6]; 2],
    /// Indexed by the full 4-bit castling-rights mask.
    pub castling: [u64; 16],
    /// Indexed by the en passant target file.
    pub en_passant_file: [u64; 8],
    /// XORed in when Black is to move.
    pub black_to_move: u64,
}

static KEYS: OnceLock<ZobristKeys> = OnceLock::new();

pub fn zobrist_keys() -> &'static ZobristKeys {
    KEYS.get_or_init(|| {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);

        let mut piece_square = [[[0u64; 64]; 6]; 2];
        for color in piece_square.iter_mut() {
            for piece in color.iter_mut() {
                for square in piece.iter_mut() {
                    *square = rng.random::<u64>();
                }
            }
        }

        let mut castling = [0u64; 16];
        for key in castling.iter_mut() {
            *key = rng.random::<u64>();
        }

        let mut en_passant_file = [0u64; 8];
        for key in en_passant_file.iter_mut() {
            *key = rng.random::<u64>();
        }

        ZobristKeys {
            piece_square,
            castling,
            en_passant_file,
            black_to_move: rng.random::<u64>(),
        }
    })
}

#[inline]
pub fn piece_key(color: Color, piece: PieceKind, square: Square) -> u64 {
    zobrist_keys().piece_square[color.index()][piece.index()][square as usize]
}

#[inline]
pub fn castling_key(rights: CastlingRights) -> u64 {
    zobrist_keys().castling[(rights & 0xf) as usize]
}

#[inline]
pub fn en_passant_key(square: Option<Square>) -> u64 {
    match square {
        Some(sq) => zobrist_keys().en_passant_file[(sq % 8) as usize],
        None => 0,
    }
}

#[inline]
pub fn side_key(side: Color) -> u64 {
    match side {
        Color::White => 0,
        Color::Black => zobrist_keys().black_to_move,
    }
}
