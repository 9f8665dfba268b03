//! Errors used throughout the engine core.
//!
//! One typed enum covers every recoverable failure the public API can report:
//! FEN/coordinate parsing, move application against a mismatched board, and
//! undo-stack misuse. Callers match on the variant; nothing in the hot search
//! path signals errors through panics or control-flow exceptions.

use thiserror::Error;

use crate::board::types::{PieceKind, Square};

/// Unified error type for the engine core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    /// The piece-placement field (or a later field) of a FEN string is
    /// malformed. The payload describes the offending token or structure.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    /// An algebraic coordinate (for example "e4") failed to parse.
    #[error("invalid algebraic coordinate: {0}")]
    InvalidAlgebraic(String),

    /// A square index outside `0..=63` was supplied.
    #[error("square index {0} is outside the board")]
    InvalidSquare(u8),

    /// A move was requested whose moving piece does not match the board:
    /// either the from-square is empty, holds a different piece, or holds a
    /// piece of the side not on move.
    #[error("illegal move {from}->{to}: no {piece:?} of the side to move on the from-square")]
    IllegalMove {
        from: Square,
        to: Square,
        piece: PieceKind,
    },

    /// `unmake_move` was called on a position with no recorded moves.
    #[error("no move available to unmake")]
    EmptyUndoStack,
}
