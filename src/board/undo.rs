use crate::board::types::{CastlingRights, Square};
use crate::movegen::encoding::Move;

/// Single undo record pushed by `make_move` and popped by `unmake_move`.
///
/// Captures every piece of pre-move state that the move itself does not
/// encode, so unmaking restores the position bit-for-bit.
#[derive(Debug, Clone, Copy)]
pub struct UndoRecord {
    pub mv: Move,
    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_square: Option<Square>,
    pub prev_halfmove_clock: u16,
    pub prev_zobrist_key: u64,
}
