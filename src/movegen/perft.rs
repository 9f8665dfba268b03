//! Perft: exhaustive legal-move tree counts for generator validation.

use crate::board::position::Position;
use crate::movegen::generator::generate_legal;
use crate::utils::algebraic::move_name;

/// Number of leaf nodes in the legal move tree at the given depth.
pub fn perft(position: &mut Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_legal(position);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        if position.make_move(mv).is_err() {
            continue;
        }
        nodes += perft(position, depth - 1);
        let _ = position.unmake_move();
    }
    nodes
}

/// Per-root-move subtree counts, the standard way to bisect a generator bug
/// against a known-good engine's `perft divide` output.
pub fn perft_divide(position: &mut Position, depth: u8) -> Vec<(String, u64)> {
    let mut results = Vec::new();
    for mv in generate_legal(position) {
        if position.make_move(mv).is_err() {
            continue;
        }
        let nodes = if depth > 1 {
            perft(position, depth - 1)
        } else {
            1
        };
        let _ = position.unmake_move();
        results.push((move_name(mv), nodes));
    }
    results.sort();
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_counts_match_the_published_series() {
        let mut position = Position::new_game();
        assert_eq!(perft(&mut position, 1), 20);
        assert_eq!(perft(&mut position, 2), 400);
        assert_eq!(perft(&mut position, 3), 8_902);
        assert_eq!(perft(&mut position, 4), 197_281);
    }

    #[test]
    fn kiwipete_exercises_castling_pins_and_en_passant() {
        let mut position = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .expect("FEN should parse");
        assert_eq!(perft(&mut position, 1), 48);
        assert_eq!(perft(&mut position, 2), 2_039);
        assert_eq!(perft(&mut position, 3), 97_862);
    }

    #[test]
    fn en_passant_pin_position_counts_correctly() {
        // Position 3 from the standard perft suite; dominated by en passant
        // legality edge cases.
        let mut position =
            Position::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1")
                .expect("FEN should parse");
        assert_eq!(perft(&mut position, 1), 14);
        assert_eq!(perft(&mut position, 2), 191);
        assert_eq!(perft(&mut position, 3), 2_812);
        assert_eq!(perft(&mut position, 4), 43_238);
    }

    #[test]
    fn promotion_heavy_position_counts_correctly() {
        // Position 4 from the standard perft suite.
        let mut position = Position::from_fen(
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        )
        .expect("FEN should parse");
        assert_eq!(perft(&mut position, 1), 6);
        assert_eq!(perft(&mut position, 2), 264);
        assert_eq!(perft(&mut position, 3), 9_467);
    }

    #[test]
    fn divide_sums_to_the_full_count() {
        let mut position = Position::new_game();
        let divided = perft_divide(&mut position, 3);
        assert_eq!(divided.len(), 20);
        let total: u64 = divided.iter().map(|(_, nodes)| nodes).sum();
        assert_eq!(total, 8_902);
    }

    #[test]
    fn perft_leaves_the_position_untouched() {
        let mut position = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .expect("FEN should parse");
        let fen_before = position.to_fen();
        let key_before = position.zobrist_key();
        perft(&mut position, 3);
        assert_eq!(position.to_fen(), fen_before);
        assert_eq!(position.zobrist_key(), key_before);
    }
}
