//! Plain-text board rendering for logs and the command line.

use std::fmt::Write;

use crate::board::position::Position;
use crate::board::types::Color;
use crate::utils::fen_writer::piece_symbol;

/// Renders the board from White's point of view with file and rank labels.
pub fn render_board(position: &Position) -> String {
    let mut out = String::with_capacity(256);

    for rank in (0..8u8).rev() {
        let _ = write!(out, "{} ", rank + 1);
        for file in 0..8u8 {
            let symbol = match position.piece_at(rank * 8 + file) {
                Some((color, kind)) => piece_symbol(color, kind),
                None => '.',
            };
            let _ = write!(out, " {symbol}");
        }
        out.push('\n');
    }
    out.push_str("   a b c d e f g h\n");

    let _ = write!(
        out,
        "{} to move\n",
        match position.side_to_move() {
            Color::White => "White",
            Color::Black => "Black",
        }
    );
    out
}
