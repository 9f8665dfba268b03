//! Algebraic square and move naming.

use crate::board::types::{PieceKind, Square};
use crate::errors::ChessError;
use crate::movegen::encoding::Move;

/// Parses a square name such as `e4` into a 0-63 index.
pub fn parse_square(name: &str) -> Result<Square, ChessError> {
    let mut chars = name.chars();
    let (file_char, rank_char) = match (chars.next(), chars.next(), chars.next()) {
        (Some(f), Some(r), None) => (f, r),
        _ => return Err(ChessError::InvalidAlgebraic(name.to_string())),
    };

    if !('a'..='h').contains(&file_char) || !('1'..='8').contains(&rank_char) {
        return Err(ChessError::InvalidAlgebraic(name.to_string()));
    }

    let file = file_char as u8 - b'a';
    let rank = rank_char as u8 - b'1';
    Ok(rank * 8 + file)
}

/// Renders a 0-63 square index as a name such as `e4`.
pub fn square_name(square: Square) -> String {
    let file = (b'a' + square % 8) as char;
    let rank = (b'1' + square / 8) as char;
    format!("{file}{rank}")
}

/// Long algebraic / UCI form of a move, e.g. `e2e4` or `a7a8q`.
pub fn move_name(mv: Move) -> String {
    let mut name = square_name(mv.from_square());
    name.push_str(&square_name(mv.to_square()));
    if let Some(promotion) = mv.promotion_piece() {
        name.push(match promotion {
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            _ => '?',
        });
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::types::PieceKind;

    #[test]
    fn square_names_round_trip() {
        assert_eq!(parse_square("a1").expect("valid square"), 0);
        assert_eq!(parse_square("h8").expect("valid square"), 63);
        assert_eq!(parse_square("e4").expect("valid square"), 28);
        for square in 0..64u8 {
            assert_eq!(
                parse_square(&square_name(square)).expect("valid square"),
                square
            );
        }
    }

    #[test]
    fn bad_square_names_are_rejected() {
        for bad in ["", "e", "e44", "i4", "a9", "4e"] {
            assert!(parse_square(bad).is_err(), "'{bad}' should be rejected");
        }
    }

    #[test]
    fn promotion_moves_carry_their_suffix() {
        let mv = Move::new(48, 56, PieceKind::Pawn, None, Some(PieceKind::Queen), 0);
        assert_eq!(move_name(mv), "a7a8q");
    }
}
