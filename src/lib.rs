//! Crate root module declarations for the Quince Chess engine core.
//!
//! This file exposes all engine subsystems (board state, attack masks, move
//! generation, evaluation, search, and conversion utilities) so binaries,
//! tests, and embedding applications can import stable module paths.

pub mod board {
    pub mod position;
    pub mod rules;
    pub mod types;
    pub mod undo;
}

pub mod attacks {
    pub mod bishop;
    pub mod king;
    pub mod knight;
    pub mod pawn;
    pub mod queen;
    pub mod rook;
}

pub mod movegen {
    pub mod checks;
    pub mod encoding;
    pub mod generator;
    pub mod perft;
}

pub mod eval {
    pub mod pst;
    pub mod scorer;
    pub mod see;
}

pub mod search {
    pub mod alpha_beta;
    pub mod transposition;
    pub mod zobrist;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_parser;
    pub mod fen_writer;
    pub mod render_position;
}

pub mod errors;
