//! Queen attacks as the union of rook and bishop rays.

use crate::attacks::bishop::bishop_attacks;
use crate::attacks::rook::rook_attacks;

#[inline]
pub const fn queen_attacks(square: u8, occupied: u64) -> u64 {
    rook_attacks(square, occupied) | bishop_attacks(square, occupied)
}
