//! Serializes a position back to Forsyth-Edwards Notation.

use crate::board::position::Position;
use crate::board::types::{
    Color, PieceKind, CASTLE_BLACK_KINGSIDE, CASTLE_BLACK_QUEENSIDE, CASTLE_WHITE_KINGSIDE,
    CASTLE_WHITE_QUEENSIDE,
};
use crate::utils::algebraic;

pub fn write_fen(position: &Position) -> String {
    let mut fen = String::with_capacity(90);

    for rank in (0..8usize).rev() {
        let mut empty_run = 0;
        for file in 0..8usize {
            match position.piece_at((rank * 8 + file) as u8) {
                Some((color, kind)) => {
                    if empty_run > 0 {
                        fen.push(char::from_digit(empty_run, 10).unwrap_or('0'));
                        empty_run = 0;
                    }
                    fen.push(piece_symbol(color, kind));
                }
                None => empty_run += 1,
            }
        }
        if empty_run > 0 {
            fen.push(char::from_digit(empty_run, 10).unwrap_or('0'));
        }
        if rank > 0 {
            fen.push('/');
        }
    }

    fen.push(' ');
    fen.push(match position.side_to_move() {
        Color::White => 'w',
        Color::Black => 'b',
    });

    fen.push(' ');
    let rights = position.castling_rights();
    if rights == 0 {
        fen.push('-');
    } else {
        if rights & CASTLE_WHITE_KINGSIDE != 0 {
            fen.push('K');
        }
        if rights & CASTLE_WHITE_QUEENSIDE != 0 {
            fen.push('Q');
        }
        if rights & CASTLE_BLACK_KINGSIDE != 0 {
            fen.push('k');
        }
        if rights & CASTLE_BLACK_QUEENSIDE != 0 {
            fen.push('q');
        }
    }

    fen.push(' ');
    match position.en_passant_square() {
        Some(square) => fen.push_str(&algebraic::square_name(square)),
        None => fen.push('-'),
    }

    fen.push_str(&format!(
        " {} {}",
        position.halfmove_clock(),
        position.fullmove_number()
    ));
    fen
}

pub fn piece_symbol(color: Color, kind: PieceKind) -> char {
    let lower = match kind {
        PieceKind::Pawn => 'p',
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        PieceKind::Queen => 'q',
        PieceKind::King => 'k',
    };
    match color {
        Color::White => lower.to_ascii_uppercase(),
        Color::Black => lower,
    }
}
