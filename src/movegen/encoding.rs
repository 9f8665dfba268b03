//! Packed move representation.
//!
//! A move fits a single `u32`: from/to squares, the moving piece, the captured
//! piece (if any), the promotion piece (if any), plus special-move flags. A
//! move therefore carries everything `unmake_move` needs short of the clock
//! and rights snapshot, which lives in the undo record.

use crate::board::types::PieceKind;

const FROM_SHIFT: u32 = 0;
const TO_SHIFT: u32 = 6;
const MOVED_PIECE_SHIFT: u32 = 12;
const CAPTURED_PIECE_SHIFT: u32 = 15;
const PROMOTION_PIECE_SHIFT: u32 = 18;

const SQUARE_MASK: u32 = 0x3f;
const PIECE_MASK: u32 = 0x7;

/// Sentinel piece code meaning "no piece" in the captured/promotion slots.
const NO_PIECE_CODE: u32 = 0x7;

pub const FLAG_CAPTURE: u32 = 1 << 21;
pub const FLAG_DOUBLE_PAWN_PUSH: u32 = 1 << 22;
pub const FLAG_EN_PASSANT: u32 = 1 << 23;
pub const FLAG_CASTLE: u32 = 1 << 24;
pub const FLAG_GIVES_CHECK: u32 = 1 << 25;

/// A fully-described chess move packed into 32 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u32);

impl Move {
    #[inline]
    pub fn new(
        from: u8,
        to: u8,
        moved: PieceKind,
        captured: Option<PieceKind>,
        promotion: Option<PieceKind>,
        flags: u32,
    ) -> Self {
        debug_assert!(from < 64 && to < 64);

        let captured_code = match captured {
            Some(kind) => kind.index() as u32,
            None => NO_PIECE_CODE,
        };
        let promotion_code = match promotion {
            Some(kind) => kind.index() as u32,
            None => NO_PIECE_CODE,
        };

        let mut bits = (from as u32) << FROM_SHIFT;
        bits |= (to as u32) << TO_SHIFT;
        bits |= (moved.index() as u32) << MOVED_PIECE_SHIFT;
        bits |= captured_code << CAPTURED_PIECE_SHIFT;
        bits |= promotion_code << PROMOTION_PIECE_SHIFT;
        bits |= flags;

        Move(bits)
    }

    #[inline]
    pub fn from_square(self) -> u8 {
        ((self.0 >> FROM_SHIFT) & SQUARE_MASK) as u8
    }

    #[inline]
    pub fn to_square(self) -> u8 {
        ((self.0 >> TO_SHIFT) & SQUARE_MASK) as u8
    }

    #[inline]
    pub fn moved_piece(self) -> PieceKind {
        let code = ((self.0 >> MOVED_PIECE_SHIFT) & PIECE_MASK) as usize;
        // The constructor only ever stores a real piece kind here.
        PieceKind::from_index(code).unwrap_or(PieceKind::Pawn)
    }

    #[inline]
    pub fn captured_piece(self) -> Option<PieceKind> {
        let code = (self.0 >> CAPTURED_PIECE_SHIFT) & PIECE_MASK;
        if code == NO_PIECE_CODE {
            None
        } else {
            PieceKind::from_index(code as usize)
        }
    }

    #[inline]
    pub fn promotion_piece(self) -> Option<PieceKind> {
        let code = (self.0 >> PROMOTION_PIECE_SHIFT) & PIECE_MASK;
        if code == NO_PIECE_CODE {
            None
        } else {
            PieceKind::from_index(code as usize)
        }
    }

    #[inline]
    pub fn is_capture(self) -> bool {
        self.0 & FLAG_CAPTURE != 0
    }

    #[inline]
    pub fn is_double_pawn_push(self) -> bool {
        self.0 & FLAG_DOUBLE_PAWN_PUSH != 0
    }

    #[inline]
    pub fn is_en_passant(self) -> bool {
        self.0 & FLAG_EN_PASSANT != 0
    }

    #[inline]
    pub fn is_castle(self) -> bool {
        self.0 & FLAG_CASTLE != 0
    }

    #[inline]
    pub fn gives_check(self) -> bool {
        self.0 & FLAG_GIVES_CHECK != 0
    }

    /// Same move with the gives-check flag set, used once legality and check
    /// status are known.
    #[inline]
    pub fn with_check_flag(self) -> Self {
        Move(self.0 | FLAG_GIVES_CHECK)
    }

    /// Raw bits, useful for deterministic tie-breaking in move ordering.
    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::types::PieceKind;

    #[test]
    fn quiet_move_round_trips_every_field() {
        let mv = Move::new(12, 28, PieceKind::Pawn, None, None, FLAG_DOUBLE_PAWN_PUSH);
        assert_eq!(mv.from_square(), 12);
        assert_eq!(mv.to_square(), 28);
        assert_eq!(mv.moved_piece(), PieceKind::Pawn);
        assert_eq!(mv.captured_piece(), None);
        assert_eq!(mv.promotion_piece(), None);
        assert!(mv.is_double_pawn_push());
        assert!(!mv.is_capture());
        assert!(!mv.is_castle());
    }

    #[test]
    fn capture_promotion_round_trips_every_field() {
        let mv = Move::new(
            54,
            63,
            PieceKind::Pawn,
            Some(PieceKind::Rook),
            Some(PieceKind::Queen),
            FLAG_CAPTURE,
        );
        assert_eq!(mv.moved_piece(), PieceKind::Pawn);
        assert_eq!(mv.captured_piece(), Some(PieceKind::Rook));
        assert_eq!(mv.promotion_piece(), Some(PieceKind::Queen));
        assert!(mv.is_capture());
        assert!(!mv.is_en_passant());
    }

    #[test]
    fn check_flag_is_additive() {
        let mv = Move::new(1, 18, PieceKind::Knight, None, None, 0);
        let flagged = mv.with_check_flag();
        assert!(!mv.gives_check());
        assert!(flagged.gives_check());
        assert_eq!(mv.from_square(), flagged.from_square());
        assert_eq!(mv.to_square(), flagged.to_square());
    }
}
