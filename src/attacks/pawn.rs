//! Per-color pawn capture tables, built once at compile time.
//!
//! These cover diagonal capture squares only; pawn pushes are handled by the
//! move generator because pushes depend on occupancy, not attack geometry.

use crate::attacks::knight::set_if_on_board;
use crate::board::types::Color;

pub const WHITE_PAWN_ATTACKS: [u64; 64] = generate_pawn_attacks(1);
pub const BLACK_PAWN_ATTACKS: [u64; 64] = generate_pawn_attacks(-1);

#[inline]
pub const fn pawn_attacks(color: Color, square: u8) -> u64 {
    match color {
        Color::White => WHITE_PAWN_ATTACKS[square as usize],
        Color::Black => BLACK_PAWN_ATTACKS[square as usize],
    }
}

const fn generate_pawn_attacks(rank_step: i32) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;

        table[sq] = set_if_on_board(file - 1, rank + rank_step)
            | set_if_on_board(file + 1, rank + rank_step);
        sq += 1;
    }

    table
}

#[cfg(test)]
mod tests {
    use super::pawn_attacks;
    use crate::board::types::Color;

    #[test]
    fn white_pawn_on_e2_attacks_d3_and_f3() {
        let expected = (1u64 << 19) | (1u64 << 21);
        assert_eq!(pawn_attacks(Color::White, 12), expected);
    }

    #[test]
    fn black_pawn_on_a7_attacks_only_b6() {
        assert_eq!(pawn_attacks(Color::Black, 48), 1u64 << 41);
    }
}
