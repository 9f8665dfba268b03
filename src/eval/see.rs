//! Static exchange evaluation (SEE).
//!
//! Scores a capture by playing out the cheapest-attacker-first exchange on
//! the target square without touching the real position. Each side may stop
//! recapturing when continuing loses material, so every recursion level
//! clamps its result at zero. X-ray attackers appear naturally because
//! slider attacks are recomputed on the shrinking occupancy.

use crate::attacks::bishop::bishop_attacks;
use crate::attacks::king::king_attacks;
use crate::attacks::knight::knight_attacks;
use crate::attacks::pawn::pawn_attacks;
use crate::attacks::rook::rook_attacks;
use crate::board::position::Position;
use crate::board::types::{Color, PieceKind, Square};
use crate::movegen::encoding::Move;

/// Exchange values. Unlike the evaluation's material values, the king is
/// huge so an exchange "winning" the king never looks attractive.
pub const EXCHANGE_VALUES: [i32; 6] = [100, 320, 330, 500, 900, 20_000];

/// Net material outcome of `mv` (a capture) after best play on the target
/// square. Positive means the capture wins material even if everything
/// recaptures; zero means an even trade.
pub fn static_exchange_evaluation(position: &Position, mv: Move) -> i32 {
    let us = position.side_to_move();
    let target = mv.to_square();

    let victim_value = match mv.captured_piece() {
        Some(kind) => EXCHANGE_VALUES[kind.index()],
        None => return 0,
    };

    // Lift the attacker off its square; for en passant the captured pawn
    // does not sit on the target square, so clear it too.
    let mut occupied = position.all_occupancy() & !(1u64 << mv.from_square());
    if mv.is_en_passant() {
        let captured_square = match us {
            Color::White => target - 8,
            Color::Black => target + 8,
        };
        occupied &= !(1u64 << captured_square);
    }

    let occupant_value = EXCHANGE_VALUES[mv.moved_piece().index()];
    victim_value - exchange_gain(position, target, occupied, us.opposite(), occupant_value)
}

/// Best achievable gain for `side` continuing the exchange against a piece
/// worth `occupant_value` standing on `target`. Never negative: the side to
/// move may always decline.
fn exchange_gain(
    position: &Position,
    target: Square,
    occupied: u64,
    side: Color,
    occupant_value: i32,
) -> i32 {
    let Some((attacker_square, attacker_kind)) =
        least_valuable_attacker(position, target, occupied, side)
    else {
        return 0;
    };

    let next_occupied = occupied & !(1u64 << attacker_square);
    let gain = occupant_value
        - exchange_gain(
            position,
            target,
            next_occupied,
            side.opposite(),
            EXCHANGE_VALUES[attacker_kind.index()],
        );
    gain.max(0)
}

/// Cheapest piece of `side` that attacks `target` on the given occupancy.
/// Pieces already spent in the exchange are absent from `occupied`.
fn least_valuable_attacker(
    position: &Position,
    target: Square,
    occupied: u64,
    side: Color,
) -> Option<(Square, PieceKind)> {
    // Attacking pawns sit on the squares a defending pawn on `target`
    // would attack.
    let pawns =
        pawn_attacks(side.opposite(), target) & position.piece_bitboard(side, PieceKind::Pawn);
    if let Some(square) = first_square(pawns & occupied) {
        return Some((square, PieceKind::Pawn));
    }

    let knights = knight_attacks(target) & position.piece_bitboard(side, PieceKind::Knight);
    if let Some(square) = first_square(knights & occupied) {
        return Some((square, PieceKind::Knight));
    }

    let diagonal = bishop_attacks(target, occupied);
    let bishops = diagonal & position.piece_bitboard(side, PieceKind::Bishop);
    if let Some(square) = first_square(bishops & occupied) {
        return Some((square, PieceKind::Bishop));
    }

    let straight = rook_attacks(target, occupied);
    let rooks = straight & position.piece_bitboard(side, PieceKind::Rook);
    if let Some(square) = first_square(rooks & occupied) {
        return Some((square, PieceKind::Rook));
    }

    let queens = (diagonal | straight) & position.piece_bitboard(side, PieceKind::Queen);
    if let Some(square) = first_square(queens & occupied) {
        return Some((square, PieceKind::Queen));
    }

    let king = king_attacks(target) & position.piece_bitboard(side, PieceKind::King);
    first_square(king & occupied).map(|square| (square, PieceKind::King))
}

#[inline]
fn first_square(bitboard: u64) -> Option<Square> {
    if bitboard == 0 {
        None
    } else {
        Some(bitboard.trailing_zeros() as Square)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::generator::generate_legal;
    use crate::utils::algebraic::move_name;

    fn see_for(fen: &str, name: &str) -> i32 {
        let mut position = Position::from_fen(fen).expect("FEN should parse");
        let mv = generate_legal(&mut position)
            .into_iter()
            .find(|mv| move_name(*mv) == name)
            .unwrap_or_else(|| panic!("move {name} should be legal in {fen}"));
        static_exchange_evaluation(&position, mv)
    }

    #[test]
    fn winning_an_undefended_queen_scores_the_full_queen() {
        // Pawn takes a queen nobody defends.
        let see = see_for("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1", "e4d5");
        assert_eq!(see, EXCHANGE_VALUES[PieceKind::Queen.index()]);
    }

    #[test]
    fn pawn_takes_defended_pawn_is_even() {
        // exd5, pawn recaptures: 100 - 100 = 0.
        let see = see_for("4k3/8/4p3/3p4/4P3/8/8/4K3 w - - 0 1", "e4d5");
        assert_eq!(see, 0);
    }

    #[test]
    fn queen_takes_defended_pawn_loses_the_queen() {
        let see = see_for("4k3/8/4p3/3p4/8/8/8/3QK3 w - - 0 1", "d1d5");
        assert_eq!(
            see,
            EXCHANGE_VALUES[PieceKind::Pawn.index()] - EXCHANGE_VALUES[PieceKind::Queen.index()]
        );
    }

    #[test]
    fn xray_recapture_is_counted() {
        // Rook takes pawn on d5; a bishop defends it, and our queen behind
        // the rook recaptures in turn: 100 - 500 + 330 = -70.
        let see = see_for("4k3/8/4b3/3p4/8/3R4/3Q4/4K3 w - - 0 1", "d3d5");
        assert_eq!(see, 100 - 500 + 330);
    }

    #[test]
    fn non_captures_score_zero() {
        let mut position = Position::new_game();
        for mv in generate_legal(&mut position) {
            if !mv.is_capture() {
                assert_eq!(static_exchange_evaluation(&position, mv), 0);
            }
        }
    }
}
