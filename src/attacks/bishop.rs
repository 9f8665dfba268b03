//! Bishop attacks, traced on demand against the current occupancy.

use crate::attacks::rook::trace_ray;

#[inline]
pub const fn bishop_attacks(square: u8, occupied: u64) -> u64 {
    trace_ray(square, 1, 1, occupied)
        | trace_ray(square, 1, -1, occupied)
        | trace_ray(square, -1, 1, occupied)
        | trace_ray(square, -1, -1, occupied)
}
