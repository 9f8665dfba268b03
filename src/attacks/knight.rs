//! Knight attack table, built once at compile time.

pub const KNIGHT_ATTACKS: [u64; 64] = generate_knight_attacks();

#[inline]
pub const fn knight_attacks(square: u8) -> u64 {
    KNIGHT_ATTACKS[square as usize]
}

const fn generate_knight_attacks() -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let mut attacks = 0u64;

        // Offsets are applied in (file, rank) space so a jump can never wrap
        // around a board edge; a plain 0-63 index check would accept wraps.
        attacks |= set_if_on_board(file + 1, rank + 2);
        attacks |= set_if_on_board(file + 2, rank + 1);
        attacks |= set_if_on_board(file + 2, rank - 1);
        attacks |= set_if_on_board(file + 1, rank - 2);
        attacks |= set_if_on_board(file - 1, rank - 2);
        attacks |= set_if_on_board(file - 2, rank - 1);
        attacks |= set_if_on_board(file - 2, rank + 1);
        attacks |= set_if_on_board(file - 1, rank + 2);

        table[sq] = attacks;
        sq += 1;
    }

    table
}

pub(crate) const fn set_if_on_board(file: i32, rank: i32) -> u64 {
    if file < 0 || file > 7 || rank < 0 || rank > 7 {
        return 0;
    }

    1u64 << ((rank as usize) * 8 + (file as usize))
}

#[cfg(test)]
mod tests {
    use super::knight_attacks;

    #[test]
    fn knight_on_a1_attacks_exactly_b3_and_c2() {
        let expected = (1u64 << 17) | (1u64 << 10);
        assert_eq!(knight_attacks(0), expected);
    }

    #[test]
    fn knight_on_d4_has_eight_targets() {
        assert_eq!(knight_attacks(27).count_ones(), 8);
    }

    #[test]
    fn knight_on_h1_never_wraps_to_the_a_file() {
        let a_file = 0x0101_0101_0101_0101u64;
        assert_eq!(knight_attacks(7) & a_file, 0);
    }
}
