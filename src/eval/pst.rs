//! Piece-square tables with separate middlegame and endgame values.
//!
//! Tables are generated at compile time from centrality and advancement
//! formulas rather than hand-tuned literals; the shapes match conventional
//! tables (knights crave the center, the middlegame king hides in the corner,
//! the endgame king centralizes) without 768 magic numbers.
//!
//! All tables are from White's perspective; callers mirror the square with
//! `square ^ 56` for Black.

use crate::board::types::PieceKind;

pub struct PieceSquareTable {
    pub mg: [i32; 64],
    pub eg: [i32; 64],
}

pub const PAWN_PST: PieceSquareTable = build_pawn_table();
pub const KNIGHT_PST: PieceSquareTable = build_knight_table();
pub const BISHOP_PST: PieceSquareTable = build_bishop_table();
pub const ROOK_PST: PieceSquareTable = build_rook_table();
pub const QUEEN_PST: PieceSquareTable = build_queen_table();
pub const KING_PST: PieceSquareTable = build_king_table();

#[inline]
pub const fn table_for(kind: PieceKind) -> &'static PieceSquareTable {
    match kind {
        PieceKind::Pawn => &PAWN_PST,
        PieceKind::Knight => &KNIGHT_PST,
        PieceKind::Bishop => &BISHOP_PST,
        PieceKind::Rook => &ROOK_PST,
        PieceKind::Queen => &QUEEN_PST,
        PieceKind::King => &KING_PST,
    }
}

/// 0 at the corners, 6 on the four center squares.
const fn centrality(square: usize) -> i32 {
    let file = (square % 8) as i32;
    let rank = (square / 8) as i32;
    let file_edge_distance = if file <= 3 { file } else { 7 - file };
    let rank_edge_distance = if rank <= 3 { rank } else { 7 - rank };
    file_edge_distance + rank_edge_distance
}

const fn rank_of(square: usize) -> i32 {
    (square / 8) as i32
}

const fn file_centrality(square: usize) -> i32 {
    let file = (square % 8) as i32;
    if file <= 3 {
        file
    } else {
        7 - file
    }
}

const fn build_pawn_table() -> PieceSquareTable {
    let mut mg = [0i32; 64];
    let mut eg = [0i32; 64];
    let mut sq = 8usize;
    // First and last ranks never hold pawns and stay zero.
    while sq < 56 {
        let advance = rank_of(sq) - 1;
        mg[sq] = advance * 4 + file_centrality(sq) * 3;
        eg[sq] = advance * 12;
        sq += 1;
    }
    PieceSquareTable { mg, eg }
}

const fn build_knight_table() -> PieceSquareTable {
    let mut mg = [0i32; 64];
    let mut eg = [0i32; 64];
    let mut sq = 0usize;
    while sq < 64 {
        mg[sq] = centrality(sq) * 8 - 24;
        eg[sq] = centrality(sq) * 6 - 18;
        sq += 1;
    }
    PieceSquareTable { mg, eg }
}

const fn build_bishop_table() -> PieceSquareTable {
    let mut mg = [0i32; 64];
    let mut eg = [0i32; 64];
    let mut sq = 0usize;
    while sq < 64 {
        mg[sq] = centrality(sq) * 4 - 10;
        eg[sq] = centrality(sq) * 5 - 14;
        sq += 1;
    }
    PieceSquareTable { mg, eg }
}

const fn build_rook_table() -> PieceSquareTable {
    let mut mg = [0i32; 64];
    let mut eg = [0i32; 64];
    let mut sq = 0usize;
    while sq < 64 {
        mg[sq] = file_centrality(sq) * 3;
        eg[sq] = 0;
        if rank_of(sq) == 6 {
            // Rook on the seventh.
            mg[sq] += 20;
            eg[sq] += 15;
        }
        sq += 1;
    }
    PieceSquareTable { mg, eg }
}

const fn build_queen_table() -> PieceSquareTable {
    let mut mg = [0i32; 64];
    let mut eg = [0i32; 64];
    let mut sq = 0usize;
    while sq < 64 {
        mg[sq] = centrality(sq) * 2 - 4;
        eg[sq] = centrality(sq) * 4 - 10;
        sq += 1;
    }
    PieceSquareTable { mg, eg }
}

const fn build_king_table() -> PieceSquareTable {
    let mut mg = [0i32; 64];
    let mut eg = [0i32; 64];
    let mut sq = 0usize;
    while sq < 64 {
        // Middlegame: stay home, prefer the castled corners.
        mg[sq] = -centrality(sq) * 8;
        if rank_of(sq) == 0 {
            mg[sq] += 20;
            if file_centrality(sq) <= 1 {
                mg[sq] += 15;
            }
        }
        // Endgame: walk to the center.
        eg[sq] = centrality(sq) * 8 - 24;
        sq += 1;
    }
    PieceSquareTable { mg, eg }
}
