//! Rook attacks, traced on demand against the current occupancy.

/// Walks one ray in (file, rank) steps, including the first blocker square.
///
/// The caller masks out its own pieces afterwards; including the blocker here
/// keeps the same trace usable for both captures and attack-detection.
pub(crate) const fn trace_ray(square: u8, file_step: i32, rank_step: i32, occupied: u64) -> u64 {
    let mut attacks = 0u64;
    let mut file = (square % 8) as i32 + file_step;
    let mut rank = (square / 8) as i32 + rank_step;

    while file >= 0 && file <= 7 && rank >= 0 && rank <= 7 {
        let bit = 1u64 << ((rank as usize) * 8 + (file as usize));
        attacks |= bit;
        if occupied & bit != 0 {
            break;
        }
        file += file_step;
        rank += rank_step;
    }

    attacks
}

#[inline]
pub const fn rook_attacks(square: u8, occupied: u64) -> u64 {
    trace_ray(square, 1, 0, occupied)
        | trace_ray(square, -1, 0, occupied)
        | trace_ray(square, 0, 1, occupied)
        | trace_ray(square, 0, -1, occupied)
}

#[cfg(test)]
mod tests {
    use super::rook_attacks;

    #[test]
    fn rook_on_empty_board_sees_full_rank_and_file() {
        let attacks = rook_attacks(0, 0);
        assert_eq!(attacks.count_ones(), 14);
    }

    #[test]
    fn rook_ray_stops_at_first_blocker_inclusive() {
        // Rook on a1, blocker on a2: a2 is attacked, a3..a8 are not.
        let attacks = rook_attacks(0, 1u64 << 8);
        assert_ne!(attacks & (1u64 << 8), 0);
        assert_eq!(attacks & (1u64 << 16), 0);
        // The east ray is unaffected.
        for sq in 1u8..8 {
            assert_ne!(attacks & (1u64 << sq), 0, "b1..h1 should stay attacked");
        }
    }
}
