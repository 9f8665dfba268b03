//! Attack detection: is a square attacked, is a king in check.

use crate::attacks::bishop::bishop_attacks;
use crate::attacks::king::king_attacks;
use crate::attacks::knight::knight_attacks;
use crate::attacks::pawn::pawn_attacks;
use crate::attacks::rook::rook_attacks;
use crate::board::position::Position;
use crate::board::types::{Color, PieceKind, Square};

/// True when any piece of `by` attacks `square` on the current occupancy.
///
/// Pawns are probed in reverse: the pawn attack mask *from* the target square
/// for the defending color lands exactly on the attacking pawns.
pub fn is_square_attacked(position: &Position, square: Square, by: Color) -> bool {
    let occupied = position.all_occupancy();

    if pawn_attacks(by.opposite(), square) & position.piece_bitboard(by, PieceKind::Pawn) != 0 {
        return true;
    }
    if knight_attacks(square) & position.piece_bitboard(by, PieceKind::Knight) != 0 {
        return true;
    }
    if king_attacks(square) & position.piece_bitboard(by, PieceKind::King) != 0 {
        return true;
    }

    let diagonal_attackers = position.piece_bitboard(by, PieceKind::Bishop)
        | position.piece_bitboard(by, PieceKind::Queen);
    if bishop_attacks(square, occupied) & diagonal_attackers != 0 {
        return true;
    }

    let straight_attackers = position.piece_bitboard(by, PieceKind::Rook)
        | position.piece_bitboard(by, PieceKind::Queen);
    rook_attacks(square, occupied) & straight_attackers != 0
}

#[inline]
pub fn is_king_in_check(position: &Position, color: Color) -> bool {
    is_square_attacked(position, position.king_square(color), color.opposite())
}

/// Bitboard of every piece of `by` attacking `square`. Slower than
/// `is_square_attacked`, which short-circuits on the first attacker; use this
/// when the full set matters.
pub fn attackers_to_square(position: &Position, square: Square, by: Color) -> u64 {
    let occupied = position.all_occupancy();
    let mut attackers = 0u64;

    attackers |=
        pawn_attacks(by.opposite(), square) & position.piece_bitboard(by, PieceKind::Pawn);
    attackers |= knight_attacks(square) & position.piece_bitboard(by, PieceKind::Knight);
    attackers |= king_attacks(square) & position.piece_bitboard(by, PieceKind::King);

    let diagonal = bishop_attacks(square, occupied);
    attackers |= diagonal
        & (position.piece_bitboard(by, PieceKind::Bishop)
            | position.piece_bitboard(by, PieceKind::Queen));

    let straight = rook_attacks(square, occupied);
    attackers |= straight
        & (position.piece_bitboard(by, PieceKind::Rook)
            | position.piece_bitboard(by, PieceKind::Queen));

    attackers
}
