//! Pseudo-legal and legal move generation.
//!
//! Legality filtering avoids the make/probe/unmake round trip for most moves:
//! a move by a non-pinned, non-king piece in a quiet position can never expose
//! its own king. Only king moves, moves while in check, en passant captures,
//! and pinned pieces leaving their pin ray get probed.

use crate::attacks::bishop::bishop_attacks;
use crate::attacks::king::king_attacks;
use crate::attacks::knight::knight_attacks;
use crate::attacks::pawn::pawn_attacks;
use crate::attacks::queen::queen_attacks;
use crate::attacks::rook::rook_attacks;
use crate::board::position::Position;
use crate::board::types::{
    Color, PieceKind, Square, CASTLE_BLACK_KINGSIDE, CASTLE_BLACK_QUEENSIDE,
    CASTLE_WHITE_KINGSIDE, CASTLE_WHITE_QUEENSIDE,
};
use crate::movegen::checks::{is_king_in_check, is_square_attacked};
use crate::movegen::encoding::{
    Move, FLAG_CAPTURE, FLAG_CASTLE, FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT,
};

const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// All moves for the side to move that obey piece movement rules, ignoring
/// whether they leave the mover's king attacked. Castling is the exception:
/// its not-through-check conditions are cheap and are applied here.
pub fn generate_pseudo_legal(position: &Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(48);
    let us = position.side_to_move();
    let own = position.occupancy(us);
    let occupied = position.all_occupancy();

    generate_pawn_moves(position, us, &mut moves);

    let mut knights = position.piece_bitboard(us, PieceKind::Knight);
    while knights != 0 {
        let from = knights.trailing_zeros() as Square;
        push_piece_moves(
            position,
            us,
            PieceKind::Knight,
            from,
            knight_attacks(from) & !own,
            &mut moves,
        );
        knights &= knights - 1;
    }

    let mut bishops = position.piece_bitboard(us, PieceKind::Bishop);
    while bishops != 0 {
        let from = bishops.trailing_zeros() as Square;
        push_piece_moves(
            position,
            us,
            PieceKind::Bishop,
            from,
            bishop_attacks(from, occupied) & !own,
            &mut moves,
        );
        bishops &= bishops - 1;
    }

    let mut rooks = position.piece_bitboard(us, PieceKind::Rook);
    while rooks != 0 {
        let from = rooks.trailing_zeros() as Square;
        push_piece_moves(
            position,
            us,
            PieceKind::Rook,
            from,
            rook_attacks(from, occupied) & !own,
            &mut moves,
        );
        rooks &= rooks - 1;
    }

    let mut queens = position.piece_bitboard(us, PieceKind::Queen);
    while queens != 0 {
        let from = queens.trailing_zeros() as Square;
        push_piece_moves(
            position,
            us,
            PieceKind::Queen,
            from,
            queen_attacks(from, occupied) & !own,
            &mut moves,
        );
        queens &= queens - 1;
    }

    let king = position.piece_bitboard(us, PieceKind::King);
    if king != 0 {
        let from = king.trailing_zeros() as Square;
        push_piece_moves(
            position,
            us,
            PieceKind::King,
            from,
            king_attacks(from) & !own,
            &mut moves,
        );
        generate_castles(position, us, &mut moves);
    }

    moves
}

/// Legal moves for the side to move, each tagged with whether it gives check.
pub fn generate_legal(position: &mut Position) -> Vec<Move> {
    let us = position.side_to_move();
    let in_check = is_king_in_check(position, us);
    let king_square = position.king_square(us);
    let pinned = pinned_pieces(position, us);

    let pseudo = generate_pseudo_legal(position);
    let mut legal = Vec::with_capacity(pseudo.len());

    for mv in pseudo {
        let from = mv.from_square();
        let from_bit = 1u64 << from;

        let needs_probe = in_check
            || mv.moved_piece() == PieceKind::King
            || mv.is_en_passant()
            || (pinned & from_bit != 0 && !stays_on_king_ray(king_square, from, mv.to_square()));

        let keeps_king_safe = if needs_probe {
            probe_is_legal(position, mv)
        } else {
            true
        };

        if keeps_king_safe {
            if move_gives_check(position, mv) {
                legal.push(mv.with_check_flag());
            } else {
                legal.push(mv);
            }
        }
    }

    legal
}

fn probe_is_legal(position: &mut Position, mv: Move) -> bool {
    let us = position.side_to_move();
    if position.make_move(mv).is_err() {
        return false;
    }
    let safe = !is_king_in_check(position, us);
    // The record was just pushed, so the pop cannot fail.
    let _ = position.unmake_move();
    safe
}

/// Bitboard of `color` pieces that stand alone between their king and an
/// enemy slider along a rook or bishop ray.
pub fn pinned_pieces(position: &Position, color: Color) -> u64 {
    let king_square = position.king_square(color);
    if king_square >= 64 {
        return 0;
    }

    let them = color.opposite();
    let occupied = position.all_occupancy();
    let own = position.occupancy(color);
    let mut pinned = 0u64;

    let straight_sliders = position.piece_bitboard(them, PieceKind::Rook)
        | position.piece_bitboard(them, PieceKind::Queen);
    let diagonal_sliders = position.piece_bitboard(them, PieceKind::Bishop)
        | position.piece_bitboard(them, PieceKind::Queen);

    for (file_step, rank_step, sliders) in [
        (1i32, 0i32, straight_sliders),
        (-1, 0, straight_sliders),
        (0, 1, straight_sliders),
        (0, -1, straight_sliders),
        (1, 1, diagonal_sliders),
        (1, -1, diagonal_sliders),
        (-1, 1, diagonal_sliders),
        (-1, -1, diagonal_sliders),
    ] {
        let mut blocker: Option<Square> = None;
        let mut file = (king_square % 8) as i32 + file_step;
        let mut rank = (king_square / 8) as i32 + rank_step;

        while (0..8).contains(&file) && (0..8).contains(&rank) {
            let square = (rank * 8 + file) as Square;
            let bit = 1u64 << square;

            if occupied & bit != 0 {
                match blocker {
                    None if own & bit != 0 => blocker = Some(square),
                    None => break,
                    Some(candidate) => {
                        if sliders & bit != 0 {
                            pinned |= 1u64 << candidate;
                        }
                        break;
                    }
                }
            }

            file += file_step;
            rank += rank_step;
        }
    }

    pinned
}

/// True when `from` and `to` lie on the same ray through the king, so a
/// pinned piece moving between them stays in front of its pinner.
fn stays_on_king_ray(king_square: Square, from: Square, to: Square) -> bool {
    match (ray_direction(king_square, from), ray_direction(king_square, to)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Normalized (file, rank) step from `a` towards `b`, if colinear on a rook
/// or bishop ray.
fn ray_direction(a: Square, b: Square) -> Option<(i32, i32)> {
    let file_delta = (b % 8) as i32 - (a % 8) as i32;
    let rank_delta = (b / 8) as i32 - (a / 8) as i32;

    if file_delta == 0 && rank_delta == 0 {
        return None;
    }
    if file_delta != 0 && rank_delta != 0 && file_delta.abs() != rank_delta.abs() {
        return None;
    }
    Some((file_delta.signum(), rank_delta.signum()))
}

/// Whether `mv` would leave the opponent's king attacked, computed on a
/// simulated occupancy without mutating the position. Covers direct checks,
/// discovered checks through the vacated square, the en passant removal, and
/// the castling rook's arrival.
pub fn move_gives_check(position: &Position, mv: Move) -> bool {
    let us = position.side_to_move();
    let them = us.opposite();
    let enemy_king = position.king_square(them);
    if enemy_king >= 64 {
        return false;
    }

    let from = mv.from_square();
    let to = mv.to_square();
    let from_bit = 1u64 << from;
    let to_bit = 1u64 << to;

    let mut occupied = (position.all_occupancy() & !from_bit) | to_bit;
    if mv.is_en_passant() {
        let captured_square = match us {
            Color::White => to - 8,
            Color::Black => to + 8,
        };
        occupied &= !(1u64 << captured_square);
    }

    let final_kind = mv.promotion_piece().unwrap_or_else(|| mv.moved_piece());
    let direct = match final_kind {
        PieceKind::Pawn => pawn_attacks(us, to) & (1u64 << enemy_king) != 0,
        PieceKind::Knight => knight_attacks(to) & (1u64 << enemy_king) != 0,
        PieceKind::Bishop => bishop_attacks(to, occupied) & (1u64 << enemy_king) != 0,
        PieceKind::Rook => rook_attacks(to, occupied) & (1u64 << enemy_king) != 0,
        PieceKind::Queen => queen_attacks(to, occupied) & (1u64 << enemy_king) != 0,
        PieceKind::King => false,
    };
    if direct {
        return true;
    }

    if mv.is_castle() {
        let rook_to: Square = match to {
            6 => 5,
            2 => 3,
            62 => 61,
            _ => 59,
        };
        let castle_occupied = occupied & !(1u64 << castle_rook_from(to)) | (1u64 << rook_to);
        if rook_attacks(rook_to, castle_occupied) & (1u64 << enemy_king) != 0 {
            return true;
        }
    }

    // Discovered check: a slider of ours now sees the enemy king through the
    // vacated squares. The mover itself sits on `to`, already handled above.
    let diagonal_sliders = (position.piece_bitboard(us, PieceKind::Bishop)
        | position.piece_bitboard(us, PieceKind::Queen))
        & !from_bit;
    if bishop_attacks(enemy_king, occupied) & diagonal_sliders != 0 {
        return true;
    }

    let straight_sliders = (position.piece_bitboard(us, PieceKind::Rook)
        | position.piece_bitboard(us, PieceKind::Queen))
        & !from_bit;
    rook_attacks(enemy_king, occupied) & straight_sliders != 0
}

#[inline]
fn castle_rook_from(king_to: Square) -> Square {
    match king_to {
        6 => 7,
        2 => 0,
        62 => 63,
        _ => 56,
    }
}

fn push_piece_moves(
    position: &Position,
    us: Color,
    kind: PieceKind,
    from: Square,
    mut targets: u64,
    moves: &mut Vec<Move>,
) {
    let them = us.opposite();
    while targets != 0 {
        let to = targets.trailing_zeros() as Square;
        match enemy_piece_on(position, them, to) {
            Some(captured) => {
                moves.push(Move::new(from, to, kind, Some(captured), None, FLAG_CAPTURE))
            }
            None => moves.push(Move::new(from, to, kind, None, None, 0)),
        }
        targets &= targets - 1;
    }
}

fn enemy_piece_on(position: &Position, them: Color, square: Square) -> Option<PieceKind> {
    let bit = 1u64 << square;
    if position.occupancy(them) & bit == 0 {
        return None;
    }
    for kind in [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ] {
        if position.piece_bitboard(them, kind) & bit != 0 {
            return Some(kind);
        }
    }
    None
}

fn generate_pawn_moves(position: &Position, us: Color, moves: &mut Vec<Move>) {
    let them = us.opposite();
    let occupied = position.all_occupancy();
    let enemy_occupancy = position.occupancy(them);
    let (push_step, start_rank, promotion_rank): (i32, u8, u8) = match us {
        Color::White => (8, 1, 7),
        Color::Black => (-8, 6, 0),
    };

    let mut pawns = position.piece_bitboard(us, PieceKind::Pawn);
    while pawns != 0 {
        let from = pawns.trailing_zeros() as Square;
        pawns &= pawns - 1;

        let single = (from as i32 + push_step) as Square;
        if occupied & (1u64 << single) == 0 {
            if single / 8 == promotion_rank {
                for promotion in PROMOTION_KINDS {
                    moves.push(Move::new(from, single, PieceKind::Pawn, None, Some(promotion), 0));
                }
            } else {
                moves.push(Move::new(from, single, PieceKind::Pawn, None, None, 0));
                if from / 8 == start_rank {
                    let double = (from as i32 + 2 * push_step) as Square;
                    if occupied & (1u64 << double) == 0 {
                        moves.push(Move::new(
                            from,
                            double,
                            PieceKind::Pawn,
                            None,
                            None,
                            FLAG_DOUBLE_PAWN_PUSH,
                        ));
                    }
                }
            }
        }

        let mut captures = pawn_attacks(us, from) & enemy_occupancy;
        while captures != 0 {
            let to = captures.trailing_zeros() as Square;
            captures &= captures - 1;

            let captured = enemy_piece_on(position, them, to);
            if to / 8 == promotion_rank {
                for promotion in PROMOTION_KINDS {
                    moves.push(Move::new(
                        from,
                        to,
                        PieceKind::Pawn,
                        captured,
                        Some(promotion),
                        FLAG_CAPTURE,
                    ));
                }
            } else {
                moves.push(Move::new(from, to, PieceKind::Pawn, captured, None, FLAG_CAPTURE));
            }
        }

        if let Some(ep_square) = position.en_passant_square() {
            if pawn_attacks(us, from) & (1u64 << ep_square) != 0 {
                moves.push(Move::new(
                    from,
                    ep_square,
                    PieceKind::Pawn,
                    Some(PieceKind::Pawn),
                    None,
                    FLAG_CAPTURE | FLAG_EN_PASSANT,
                ));
            }
        }
    }
}

fn generate_castles(position: &Position, us: Color, moves: &mut Vec<Move>) {
    let rights = position.castling_rights();
    let occupied = position.all_occupancy();
    let them = us.opposite();

    let candidates: [(u8, u64, [Square; 3], Square, Square); 2] = match us {
        Color::White => [
            (
                rights & CASTLE_WHITE_KINGSIDE,
                (1u64 << 5) | (1u64 << 6),
                [4, 5, 6],
                4,
                6,
            ),
            (
                rights & CASTLE_WHITE_QUEENSIDE,
                (1u64 << 1) | (1u64 << 2) | (1u64 << 3),
                [4, 3, 2],
                4,
                2,
            ),
        ],
        Color::Black => [
            (
                rights & CASTLE_BLACK_KINGSIDE,
                (1u64 << 61) | (1u64 << 62),
                [60, 61, 62],
                60,
                62,
            ),
            (
                rights & CASTLE_BLACK_QUEENSIDE,
                (1u64 << 57) | (1u64 << 58) | (1u64 << 59),
                [60, 59, 58],
                60,
                58,
            ),
        ],
    };

    for (right, between, king_path, from, to) in candidates {
        if right == 0 || occupied & between != 0 {
            continue;
        }
        if king_path
            .iter()
            .any(|&square| is_square_attacked(position, square, them))
        {
            continue;
        }
        moves.push(Move::new(from, to, PieceKind::King, None, None, FLAG_CASTLE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legal_names(fen: &str) -> Vec<String> {
        let mut position = Position::from_fen(fen).expect("FEN should parse");
        let mut names: Vec<String> = generate_legal(&mut position)
            .into_iter()
            .map(crate::utils::algebraic::move_name)
            .collect();
        names.sort();
        names
    }

    #[test]
    fn starting_position_has_twenty_legal_moves() {
        let mut position = Position::new_game();
        assert_eq!(generate_legal(&mut position).len(), 20);
    }

    #[test]
    fn pseudo_legal_moves_never_land_on_own_pieces() {
        let mut position = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .expect("FEN should parse");
        let own = position.occupancy(Color::White);
        for mv in generate_pseudo_legal(&mut position) {
            assert_eq!(own & (1u64 << mv.to_square()), 0, "{:?}", mv);
        }
    }

    #[test]
    fn pinned_rook_may_slide_along_its_pin_ray_only() {
        // White rook on d2 pinned by the rook on d8 against the king on d1:
        // it may advance up the file or capture the pinner, never leave it.
        let names = legal_names("3r3k/8/8/8/8/8/3R4/3K4 w - - 0 1");
        assert!(names.contains(&"d2d3".to_string()));
        assert!(names.contains(&"d2d8".to_string()));
        assert!(!names.contains(&"d2c2".to_string()));
        assert!(!names.contains(&"d2e2".to_string()));
    }

    #[test]
    fn pinned_bishop_on_a_file_has_no_moves() {
        // A bishop can never stay on the file it is pinned along.
        let names = legal_names("3r3k/8/8/8/8/8/3B4/3K4 w - - 0 1");
        assert!(!names.iter().any(|name| name.starts_with("d2")));
    }

    #[test]
    fn check_evasions_are_the_only_moves_in_check() {
        // Queen on h1 checks the king on e1 along the first rank. Every reply
        // must step the king off the rank; d1 and f1 stay covered.
        let names = legal_names("4k3/8/8/8/8/8/6PP/R3K2q w Q - 0 1");
        assert_eq!(names, vec!["e1d2", "e1e2", "e1f2"]);
    }

    #[test]
    fn en_passant_is_rejected_when_it_exposes_the_king() {
        // Classic trap: capturing en passant would clear the fifth rank and
        // leave the king facing the rook.
        let names = legal_names("8/8/8/k2pP2R/8/8/8/4K3 b - e6 0 1");
        assert!(!names.iter().any(|name| name == "d5e6"));
    }

    #[test]
    fn castling_is_blocked_through_an_attacked_square() {
        // Black rook on f8 covers f1, so White may not castle kingside.
        let names = legal_names("5r2/2k5/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!names.contains(&"e1g1".to_string()));
        assert!(names.contains(&"e1c1".to_string()));
    }

    #[test]
    fn generated_check_flags_agree_with_a_probe() {
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        ];
        for fen in fens {
            let mut position = Position::from_fen(fen).expect("FEN should parse");
            let side = position.side_to_move();
            for mv in generate_legal(&mut position) {
                position.make_move(mv).expect("legal move should apply");
                let actually_checks = is_king_in_check(&position, side.opposite());
                position.unmake_move().expect("undo stack should not be empty");
                assert_eq!(
                    mv.gives_check(),
                    actually_checks,
                    "check flag mismatch for {} in {fen}",
                    crate::utils::algebraic::move_name(mv)
                );
            }
        }
    }

    #[test]
    fn promotions_come_in_all_four_flavors() {
        let names = legal_names("8/P6k/8/8/8/8/7K/8 w - - 0 1");
        for suffix in ["q", "r", "b", "n"] {
            assert!(names.contains(&format!("a7a8{suffix}")));
        }
    }
}
