//! Bitboard position state with in-place make/unmake.
//!
//! The position keeps twelve piece bitboards plus per-side occupancy caches,
//! and maintains its Zobrist key incrementally as moves are made. Unmaking a
//! move restores every field bit-for-bit, including the hash, from the undo
//! record pushed by `make_move`.

use crate::board::rules::STARTING_POSITION_FEN;
use crate::board::types::{
    CastlingRights, Color, PieceKind, Square, ALL_PIECE_KINDS, CASTLE_BLACK_KINGSIDE,
    CASTLE_BLACK_QUEENSIDE, CASTLE_WHITE_KINGSIDE, CASTLE_WHITE_QUEENSIDE,
};
use crate::board::undo::UndoRecord;
use crate::errors::ChessError;
use crate::movegen::encoding::Move;
use crate::search::zobrist::{castling_key, en_passant_key, piece_key, side_key, zobrist_keys};
use crate::utils::{fen_parser, fen_writer};

/// Per-square mask of castling rights that survive a piece moving from or to
/// that square. Only the king and rook home squares clear anything.
const CASTLING_RIGHTS_MASK: [CastlingRights; 64] = build_castling_rights_mask();

const fn build_castling_rights_mask() -> [CastlingRights; 64] {
    let mut mask = [0xfu8; 64];
    mask[0] = 0xf & !CASTLE_WHITE_QUEENSIDE;
    mask[7] = 0xf & !CASTLE_WHITE_KINGSIDE;
    mask[4] = 0xf & !(CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE);
    mask[56] = 0xf & !CASTLE_BLACK_QUEENSIDE;
    mask[63] = 0xf & !CASTLE_BLACK_KINGSIDE;
    mask[60] = 0xf & !(CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE);
    mask
}

#[derive(Debug, Clone)]
pub struct Position {
    /// Piece bitboards indexed `[color][piece]`.
    pieces: [[u64; 6]; 2],
    /// Union of each side's piece bitboards, kept in lockstep with `pieces`.
    occupancy: [u64; 2],
    side_to_move: Color,
    castling_rights: CastlingRights,
    en_passant_square: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
    zobrist_key: u64,
    undo_stack: Vec<UndoRecord>,
}

impl Position {
    /// An empty board with White to move and no rights or clocks set.
    pub fn new_empty() -> Self {
        let mut position = Position {
            pieces: [[0; 6]; 2],
            occupancy: [0; 2],
            side_to_move: Color::White,
            castling_rights: 0,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            zobrist_key: 0,
            undo_stack: Vec::with_capacity(64),
        };
        position.zobrist_key = position.compute_zobrist_key();
        position
    }

    /// The standard starting position.
    pub fn new_game() -> Self {
        // The baked-in starting FEN is well-formed.
        fen_parser::parse_fen(STARTING_POSITION_FEN).unwrap_or_else(|_| Position::new_empty())
    }

    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        fen_parser::parse_fen(fen)
    }

    pub fn to_fen(&self) -> String {
        fen_writer::write_fen(self)
    }

    #[inline]
    pub fn piece_bitboard(&self, color: Color, piece: PieceKind) -> u64 {
        self.pieces[color.index()][piece.index()]
    }

    #[inline]
    pub fn occupancy(&self, color: Color) -> u64 {
        self.occupancy[color.index()]
    }

    #[inline]
    pub fn all_occupancy(&self) -> u64 {
        self.occupancy[0] | self.occupancy[1]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    #[inline]
    pub fn zobrist_key(&self) -> u64 {
        self.zobrist_key
    }

    #[inline]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Square of `color`'s king, or 64 when the board has no such king
    /// (only reachable from hand-built test positions).
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces[color.index()][PieceKind::King.index()].trailing_zeros() as Square
    }

    pub fn piece_at(&self, square: Square) -> Option<(Color, PieceKind)> {
        let bit = 1u64 << square;
        for color in [Color::White, Color::Black] {
            if self.occupancy[color.index()] & bit == 0 {
                continue;
            }
            for kind in ALL_PIECE_KINDS {
                if self.pieces[color.index()][kind.index()] & bit != 0 {
                    return Some((color, kind));
                }
            }
        }
        None
    }

    /// Places a piece and folds it into the hash. Used by the FEN parser and
    /// by test setups; `make_move` uses the internal toggles directly.
    pub fn put_piece(&mut self, color: Color, piece: PieceKind, square: Square) {
        self.toggle_piece(color, piece, square);
    }

    #[inline]
    fn toggle_piece(&mut self, color: Color, piece: PieceKind, square: Square) {
        let bit = 1u64 << square;
        self.pieces[color.index()][piece.index()] ^= bit;
        self.occupancy[color.index()] ^= bit;
        self.zobrist_key ^= piece_key(color, piece, square);
    }

    pub(crate) fn set_side_to_move(&mut self, side: Color) {
        self.zobrist_key ^= side_key(self.side_to_move) ^ side_key(side);
        self.side_to_move = side;
    }

    pub(crate) fn set_castling_rights(&mut self, rights: CastlingRights) {
        self.zobrist_key ^= castling_key(self.castling_rights) ^ castling_key(rights);
        self.castling_rights = rights;
    }

    pub(crate) fn set_en_passant_square(&mut self, square: Option<Square>) {
        self.zobrist_key ^= en_passant_key(self.en_passant_square) ^ en_passant_key(square);
        self.en_passant_square = square;
    }

    pub(crate) fn set_clocks(&mut self, halfmove: u16, fullmove: u16) {
        self.halfmove_clock = halfmove;
        self.fullmove_number = fullmove;
    }

    /// Recomputes the Zobrist key from scratch. `make_move`/`unmake_move`
    /// maintain the key incrementally; this exists to cross-check them.
    pub fn compute_zobrist_key(&self) -> u64 {
        // Force table initialization before the fold below reads them.
        let _ = zobrist_keys();

        let mut key = 0u64;
        for color in [Color::White, Color::Black] {
            for kind in ALL_PIECE_KINDS {
                let mut bb = self.pieces[color.index()][kind.index()];
                while bb != 0 {
                    let square = bb.trailing_zeros() as Square;
                    key ^= piece_key(color, kind, square);
                    bb &= bb - 1;
                }
            }
        }
        key ^= castling_key(self.castling_rights);
        key ^= en_passant_key(self.en_passant_square);
        key ^= side_key(self.side_to_move);
        key
    }

    /// Applies a move generated for this position and pushes an undo record.
    ///
    /// The move must come from the move generator for the current position;
    /// a cheap consistency check rejects moves whose source square does not
    /// hold the piece they claim to move.
    pub fn make_move(&mut self, mv: Move) -> Result<(), ChessError> {
        let mover = self.side_to_move;
        let from = mv.from_square();
        let to = mv.to_square();
        let moved = mv.moved_piece();

        if self.pieces[mover.index()][moved.index()] & (1u64 << from) == 0 {
            return Err(ChessError::IllegalMove {
                from,
                to,
                piece: moved,
            });
        }

        self.undo_stack.push(UndoRecord {
            mv,
            prev_castling_rights: self.castling_rights,
            prev_en_passant_square: self.en_passant_square,
            prev_halfmove_clock: self.halfmove_clock,
            prev_zobrist_key: self.zobrist_key,
        });

        // Remove whatever is being captured before the mover lands.
        if mv.is_en_passant() {
            let captured_square = match mover {
                Color::White => to - 8,
                Color::Black => to + 8,
            };
            self.toggle_piece(mover.opposite(), PieceKind::Pawn, captured_square);
        } else if let Some(captured) = mv.captured_piece() {
            self.toggle_piece(mover.opposite(), captured, to);
        }

        self.toggle_piece(mover, moved, from);
        match mv.promotion_piece() {
            Some(promoted) => self.toggle_piece(mover, promoted, to),
            None => self.toggle_piece(mover, moved, to),
        }

        if mv.is_castle() {
            let (rook_from, rook_to) = rook_castle_squares(from, to);
            self.toggle_piece(mover, PieceKind::Rook, rook_from);
            self.toggle_piece(mover, PieceKind::Rook, rook_to);
        }

        let new_rights =
            self.castling_rights & CASTLING_RIGHTS_MASK[from as usize] & CASTLING_RIGHTS_MASK[to as usize];
        self.set_castling_rights(new_rights);

        let new_ep = if mv.is_double_pawn_push() {
            Some((from + to) / 2)
        } else {
            None
        };
        self.set_en_passant_square(new_ep);

        if moved == PieceKind::Pawn || mv.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if mover == Color::Black {
            self.fullmove_number += 1;
        }

        self.set_side_to_move(mover.opposite());
        Ok(())
    }

    /// Pops the most recent undo record and restores the prior position
    /// exactly, hash included.
    pub fn unmake_move(&mut self) -> Result<(), ChessError> {
        let record = self.undo_stack.pop().ok_or(ChessError::EmptyUndoStack)?;
        let mv = record.mv;
        let mover = self.side_to_move.opposite();
        let from = mv.from_square();
        let to = mv.to_square();
        let moved = mv.moved_piece();

        // Reverse the piece movement without touching the hash bookkeeping;
        // the saved key is restored wholesale below.
        match mv.promotion_piece() {
            Some(promoted) => self.toggle_piece(mover, promoted, to),
            None => self.toggle_piece(mover, moved, to),
        }
        self.toggle_piece(mover, moved, from);

        if mv.is_en_passant() {
            let captured_square = match mover {
                Color::White => to - 8,
                Color::Black => to + 8,
            };
            self.toggle_piece(mover.opposite(), PieceKind::Pawn, captured_square);
        } else if let Some(captured) = mv.captured_piece() {
            self.toggle_piece(mover.opposite(), captured, to);
        }

        if mv.is_castle() {
            let (rook_from, rook_to) = rook_castle_squares(from, to);
            self.toggle_piece(mover, PieceKind::Rook, rook_to);
            self.toggle_piece(mover, PieceKind::Rook, rook_from);
        }

        if mover == Color::Black {
            self.fullmove_number -= 1;
        }
        self.side_to_move = mover;
        self.castling_rights = record.prev_castling_rights;
        self.en_passant_square = record.prev_en_passant_square;
        self.halfmove_clock = record.prev_halfmove_clock;
        self.zobrist_key = record.prev_zobrist_key;
        Ok(())
    }
}

/// Rook shuffle for the four castle destinations, keyed by the king's path.
#[inline]
fn rook_castle_squares(king_from: Square, king_to: Square) -> (Square, Square) {
    match (king_from, king_to) {
        (4, 6) => (7, 5),
        (4, 2) => (0, 3),
        (60, 62) => (63, 61),
        (60, 58) => (56, 59),
        // Unreachable for moves produced by the generator.
        _ => (king_from, king_from),
    }
}
