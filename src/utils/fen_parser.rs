//! Forsyth-Edwards Notation (FEN) parsing.
//!
//! The placement field is mandatory; every later field falls back to a
//! sensible default when absent (White to move, no rights, no en passant,
//! zeroed clocks with fullmove 1), so truncated FENs from logs still load.
//!
//! The parser also enforces the board invariants the rest of the engine
//! assumes: exactly one king per side and no pawns on the first or last
//! rank. Castling flags whose king or rook is off its home square are
//! silently dropped rather than rejected, since such FENs are common in
//! hand-edited inputs.

use crate::board::position::Position;
use crate::board::types::{
    CastlingRights, Color, PieceKind, CASTLE_BLACK_KINGSIDE, CASTLE_BLACK_QUEENSIDE,
    CASTLE_WHITE_KINGSIDE, CASTLE_WHITE_QUEENSIDE,
};
use crate::errors::ChessError;
use crate::utils::algebraic;

pub fn parse_fen(fen: &str) -> Result<Position, ChessError> {
    let mut fields = fen.split_whitespace();

    let placement = fields
        .next()
        .ok_or_else(|| ChessError::InvalidFen("empty FEN string".to_string()))?;

    let mut position = Position::new_empty();
    parse_placement(&mut position, placement)?;
    validate_placement(&position)?;

    let side = match fields.next() {
        Some("w") | None => Color::White,
        Some("b") => Color::Black,
        Some(other) => {
            return Err(ChessError::InvalidFen(format!(
                "unknown side to move '{other}'"
            )))
        }
    };
    position.set_side_to_move(side);

    let rights = match fields.next() {
        Some(field) => parse_castling_rights(field)?,
        None => 0,
    };
    position.set_castling_rights(rights & supportable_castling_rights(&position));

    let en_passant = match fields.next() {
        Some("-") | None => None,
        Some(field) => Some(
            algebraic::parse_square(field)
                .map_err(|_| ChessError::InvalidFen(format!("bad en passant square '{field}'")))?,
        ),
    };
    position.set_en_passant_square(en_passant);

    let halfmove = parse_clock(fields.next(), 0, "halfmove clock")?;
    let fullmove = parse_clock(fields.next(), 1, "fullmove number")?;
    position.set_clocks(halfmove, fullmove);

    Ok(position)
}

fn parse_placement(position: &mut Position, placement: &str) -> Result<(), ChessError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(ChessError::InvalidFen(format!(
            "expected 8 ranks, found {}",
            ranks.len()
        )));
    }

    // FEN lists ranks from 8 down to 1.
    for (row, rank_text) in ranks.iter().enumerate() {
        let rank = 7 - row;
        let mut file = 0usize;

        for symbol in rank_text.chars() {
            if let Some(skip) = symbol.to_digit(10) {
                file += skip as usize;
                continue;
            }

            if file >= 8 {
                return Err(ChessError::InvalidFen(format!(
                    "rank '{rank_text}' overflows 8 files"
                )));
            }

            let (color, kind) = piece_from_symbol(symbol).ok_or_else(|| {
                ChessError::InvalidFen(format!("unknown piece symbol '{symbol}'"))
            })?;
            position.put_piece(color, kind, (rank * 8 + file) as u8);
            file += 1;
        }

        if file != 8 {
            return Err(ChessError::InvalidFen(format!(
                "rank '{rank_text}' covers {file} files, expected 8"
            )));
        }
    }

    Ok(())
}

/// Rejects placements the engine cannot operate on: the attack and legality
/// code indexes by the king square and steps pawns one rank, so each side
/// needs exactly one king and no pawn may stand on a back rank.
fn validate_placement(position: &Position) -> Result<(), ChessError> {
    for color in [Color::White, Color::Black] {
        let kings = position.piece_bitboard(color, PieceKind::King).count_ones();
        if kings != 1 {
            return Err(ChessError::InvalidFen(format!(
                "expected exactly one {color:?} king, found {kings}"
            )));
        }
    }

    const BACK_RANKS: u64 = 0xff | (0xff << 56);
    let pawns = position.piece_bitboard(Color::White, PieceKind::Pawn)
        | position.piece_bitboard(Color::Black, PieceKind::Pawn);
    if pawns & BACK_RANKS != 0 {
        return Err(ChessError::InvalidFen(
            "pawn on the first or last rank".to_string(),
        ));
    }

    Ok(())
}

/// Castling flags only make sense while the king and the matching rook are
/// on their home squares; anything else is masked off so the generator never
/// castles with a phantom rook.
fn supportable_castling_rights(position: &Position) -> CastlingRights {
    let mut supportable = 0;

    let white_rooks = position.piece_bitboard(Color::White, PieceKind::Rook);
    if position.piece_bitboard(Color::White, PieceKind::King) & (1u64 << 4) != 0 {
        if white_rooks & (1u64 << 7) != 0 {
            supportable |= CASTLE_WHITE_KINGSIDE;
        }
        if white_rooks & 1u64 != 0 {
            supportable |= CASTLE_WHITE_QUEENSIDE;
        }
    }

    let black_rooks = position.piece_bitboard(Color::Black, PieceKind::Rook);
    if position.piece_bitboard(Color::Black, PieceKind::King) & (1u64 << 60) != 0 {
        if black_rooks & (1u64 << 63) != 0 {
            supportable |= CASTLE_BLACK_KINGSIDE;
        }
        if black_rooks & (1u64 << 56) != 0 {
            supportable |= CASTLE_BLACK_QUEENSIDE;
        }
    }

    supportable
}

fn parse_castling_rights(field: &str) -> Result<CastlingRights, ChessError> {
    if field == "-" {
        return Ok(0);
    }

    let mut rights = 0;
    for symbol in field.chars() {
        rights |= match symbol {
            'K' => CASTLE_WHITE_KINGSIDE,
            'Q' => CASTLE_WHITE_QUEENSIDE,
            'k' => CASTLE_BLACK_KINGSIDE,
            'q' => CASTLE_BLACK_QUEENSIDE,
            other => {
                return Err(ChessError::InvalidFen(format!(
                    "unknown castling symbol '{other}'"
                )))
            }
        };
    }
    Ok(rights)
}

fn parse_clock(field: Option<&str>, default: u16, label: &str) -> Result<u16, ChessError> {
    match field {
        None => Ok(default),
        Some(text) => text
            .parse::<u16>()
            .map_err(|_| ChessError::InvalidFen(format!("bad {label} '{text}'"))),
    }
}

pub fn piece_from_symbol(symbol: char) -> Option<(Color, PieceKind)> {
    let color = if symbol.is_ascii_uppercase() {
        Color::White
    } else {
        Color::Black
    };
    let kind = match symbol.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };
    Some((color, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::rules::STARTING_POSITION_FEN;

    #[test]
    fn starting_position_parses_every_field() {
        let position = parse_fen(STARTING_POSITION_FEN).expect("FEN should parse");
        assert_eq!(position.side_to_move(), Color::White);
        assert_eq!(position.castling_rights(), 0xf);
        assert_eq!(position.en_passant_square(), None);
        assert_eq!(position.halfmove_clock(), 0);
        assert_eq!(position.fullmove_number(), 1);
        assert_eq!(
            position.piece_at(4),
            Some((Color::White, PieceKind::King))
        );
        assert_eq!(
            position.piece_at(63),
            Some((Color::Black, PieceKind::Rook))
        );
    }

    #[test]
    fn missing_trailing_fields_fall_back_to_defaults() {
        let position =
            parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").expect("FEN should parse");
        assert_eq!(position.side_to_move(), Color::White);
        assert_eq!(position.castling_rights(), 0);
        assert_eq!(position.en_passant_square(), None);
        assert_eq!(position.halfmove_clock(), 0);
        assert_eq!(position.fullmove_number(), 1);
    }

    #[test]
    fn en_passant_square_is_read_when_present() {
        let position = parse_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
            .expect("FEN should parse");
        assert_eq!(position.en_passant_square(), Some(20));
    }

    #[test]
    fn malformed_inputs_are_rejected_with_invalid_fen() {
        for bad in [
            "",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP",
            "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQxq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq z9 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - abc 1",
        ] {
            assert!(
                matches!(parse_fen(bad), Err(ChessError::InvalidFen(_))),
                "'{bad}' should be rejected"
            );
        }
    }

    #[test]
    fn placements_without_exactly_one_king_per_side_are_rejected() {
        for bad in [
            "8/8/8/8/8/8/8/8 w - - 0 1",
            "4k3/8/8/8/8/8/8/8 w - - 0 1",
            "8/8/8/8/8/8/8/4K3 w - - 0 1",
            "4k3/8/8/8/8/8/8/2K1K3 w - - 0 1",
            "4k2k/8/8/8/8/8/8/4K3 w - - 0 1",
        ] {
            assert!(
                matches!(parse_fen(bad), Err(ChessError::InvalidFen(_))),
                "'{bad}' should be rejected"
            );
        }
    }

    #[test]
    fn pawns_on_the_back_ranks_are_rejected() {
        for bad in [
            "P3k3/8/8/8/8/8/8/4K3 w - - 0 1",
            "4k3/8/8/8/8/8/8/p3K3 w - - 0 1",
        ] {
            assert!(
                matches!(parse_fen(bad), Err(ChessError::InvalidFen(_))),
                "'{bad}' should be rejected"
            );
        }
    }

    #[test]
    fn castling_rights_without_king_and_rook_at_home_are_dropped() {
        // No rooks at all: every claimed right is noise.
        let bare = parse_fen("4k3/8/8/8/8/8/8/4K3 w KQkq - 0 1").expect("FEN should parse");
        assert_eq!(bare.castling_rights(), 0);

        // King off its home square drops that side's rights even with rooks
        // in the corners.
        let wandered =
            parse_fen("r3k2r/8/8/8/8/8/4K3/R6R w KQkq - 0 1").expect("FEN should parse");
        assert_eq!(
            wandered.castling_rights(),
            CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE
        );

        // Only the rights whose rook survives are kept.
        let partial =
            parse_fen("r3k3/8/8/8/8/8/8/4K2R w Kq - 0 1").expect("FEN should parse");
        assert_eq!(
            partial.castling_rights(),
            CASTLE_WHITE_KINGSIDE | CASTLE_BLACK_QUEENSIDE
        );
    }

    #[test]
    fn parsed_hash_matches_a_full_recompute() {
        let position = parse_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R b Kq - 3 9")
            .expect("FEN should parse");
        assert_eq!(position.zobrist_key(), position.compute_zobrist_key());
    }
}
