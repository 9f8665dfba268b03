//! Tapered static evaluation.
//!
//! The score blends middlegame and endgame terms by a material-based phase,
//! then adds mobility, king-ring pressure, and piece-protection terms. All
//! term weights live in `EvalWeights` so callers can tune them without
//! touching the scorer.

use crate::attacks::bishop::bishop_attacks;
use crate::attacks::king::king_attacks;
use crate::attacks::knight::knight_attacks;
use crate::attacks::pawn::pawn_attacks;
use crate::attacks::queen::queen_attacks;
use crate::attacks::rook::rook_attacks;
use crate::board::position::Position;
use crate::board::types::{Color, PieceKind, Square, ALL_PIECE_KINDS};
use crate::eval::pst::table_for;

/// Centipawn material values indexed by piece kind. The king carries no
/// material value; losing it ends the game instead.
pub const PIECE_VALUES: [i32; 6] = [100, 320, 330, 500, 900, 0];

/// Phase contribution per piece kind; 24 total at the starting position.
const PHASE_WEIGHTS: [i32; 6] = [0, 1, 1, 2, 4, 0];
pub const MAX_PHASE: i32 = 24;

/// Tunable evaluation term weights, in centipawns per unit.
#[derive(Debug, Clone)]
pub struct EvalWeights {
    /// Per reachable empty square.
    pub mobility_quiet: i32,
    /// Per attacked enemy piece; captures are worth more than quiet mobility.
    pub mobility_capture: i32,
    /// Per own attack landing in the ring around the enemy king.
    pub king_ring_attack: i32,
    /// Per own non-king piece defended by another own piece.
    pub protection: i32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        EvalWeights {
            mobility_quiet: 2,
            mobility_capture: 4,
            king_ring_attack: 6,
            protection: 3,
        }
    }
}

/// Scoring seam: the search only needs "position in, centipawns out", so
/// alternative scorers slot in behind this trait.
pub trait Evaluate {
    /// Static score in centipawns from the side to move's perspective.
    fn evaluate(&self, position: &Position) -> i32;
}

/// Material-count-only baseline, handy for debugging search behavior in
/// isolation from positional terms.
#[derive(Debug, Clone, Default)]
pub struct MaterialEvaluator;

impl Evaluate for MaterialEvaluator {
    fn evaluate(&self, position: &Position) -> i32 {
        let mut white_minus_black = 0;
        for kind in ALL_PIECE_KINDS {
            let balance = position.piece_bitboard(Color::White, kind).count_ones() as i32
                - position.piece_bitboard(Color::Black, kind).count_ones() as i32;
            white_minus_black += balance * PIECE_VALUES[kind.index()];
        }
        match position.side_to_move() {
            Color::White => white_minus_black,
            Color::Black => -white_minus_black,
        }
    }
}

/// The full tapered scorer: material, phase-blended piece-square bonuses,
/// mobility, king-ring pressure, and protection.
#[derive(Debug, Clone, Default)]
pub struct TaperedEvaluator {
    pub weights: EvalWeights,
}

impl Evaluate for TaperedEvaluator {
    fn evaluate(&self, position: &Position) -> i32 {
        evaluate(position, &self.weights)
    }
}

/// Game phase in `0..=MAX_PHASE`; `MAX_PHASE` is a full board, 0 a bare
/// king-and-pawn endgame. Clamped so promotions cannot push it past full.
pub fn game_phase(position: &Position) -> i32 {
    let mut phase = 0;
    for color in [Color::White, Color::Black] {
        for kind in ALL_PIECE_KINDS {
            phase += PHASE_WEIGHTS[kind.index()]
                * position.piece_bitboard(color, kind).count_ones() as i32;
        }
    }
    phase.min(MAX_PHASE)
}

/// Static score in centipawns from the side to move's perspective.
pub fn evaluate(position: &Position, weights: &EvalWeights) -> i32 {
    let phase = game_phase(position);
    let white = side_score(position, Color::White, phase, weights);
    let black = side_score(position, Color::Black, phase, weights);
    let white_minus_black = white - black;

    match position.side_to_move() {
        Color::White => white_minus_black,
        Color::Black => -white_minus_black,
    }
}

fn side_score(position: &Position, us: Color, phase: i32, weights: &EvalWeights) -> i32 {
    let them = us.opposite();
    let occupied = position.all_occupancy();
    let own_occupancy = position.occupancy(us);
    let enemy_occupancy = position.occupancy(them);
    let enemy_king_ring = king_ring(position, them);

    let mut score = 0;
    let mut ring_attacks = 0;
    let mut protected = 0u64;

    for kind in ALL_PIECE_KINDS {
        let mut pieces = position.piece_bitboard(us, kind);
        while pieces != 0 {
            let square = pieces.trailing_zeros() as Square;
            pieces &= pieces - 1;

            score += PIECE_VALUES[kind.index()];
            score += tapered_square_bonus(us, kind, square, phase);

            let attacks = attack_set(us, kind, square, occupied);
            ring_attacks += (attacks & enemy_king_ring).count_ones() as i32;
            protected |= attacks & own_occupancy;

            let quiet = (attacks & !occupied).count_ones() as i32;
            let captures = (attacks & enemy_occupancy).count_ones() as i32;
            score += quiet * weights.mobility_quiet + captures * weights.mobility_capture;

            // Pawn pushes are mobility too, but only onto empty squares.
            if kind == PieceKind::Pawn {
                let push = match us {
                    Color::White => square + 8,
                    Color::Black => square - 8,
                };
                if occupied & (1u64 << push) == 0 {
                    score += weights.mobility_quiet;
                }
            }
        }
    }

    score += ring_attacks * weights.king_ring_attack;

    let defended_pieces =
        protected & !position.piece_bitboard(us, PieceKind::King);
    score += defended_pieces.count_ones() as i32 * weights.protection;

    score
}

#[inline]
fn tapered_square_bonus(us: Color, kind: PieceKind, square: Square, phase: i32) -> i32 {
    let index = match us {
        Color::White => square as usize,
        Color::Black => (square ^ 56) as usize,
    };
    let table = table_for(kind);
    (table.mg[index] * phase + table.eg[index] * (MAX_PHASE - phase)) / MAX_PHASE
}

/// The enemy king's square plus its neighbors.
fn king_ring(position: &Position, color: Color) -> u64 {
    let king = position.piece_bitboard(color, PieceKind::King);
    if king == 0 {
        return 0;
    }
    let square = king.trailing_zeros() as Square;
    king | king_attacks(square)
}

/// Attack mask for one piece on the given occupancy. Pawn entries cover
/// capture squares only; pushes are handled separately by the caller.
fn attack_set(us: Color, kind: PieceKind, square: Square, occupied: u64) -> u64 {
    match kind {
        PieceKind::Pawn => pawn_attacks(us, square),
        PieceKind::Knight => knight_attacks(square),
        PieceKind::Bishop => bishop_attacks(square, occupied),
        PieceKind::Rook => rook_attacks(square, occupied),
        PieceKind::Queen => queen_attacks(square, occupied),
        PieceKind::King => king_attacks(square),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_is_symmetric() {
        let position = Position::new_game();
        let weights = EvalWeights::default();
        assert_eq!(evaluate(&position, &weights), 0);
        assert_eq!(game_phase(&position), MAX_PHASE);
    }

    #[test]
    fn evaluation_is_from_the_side_to_move_perspective() {
        let weights = EvalWeights::default();
        // White is up a queen.
        let white_to_move =
            Position::from_fen("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
                .expect("FEN should parse");
        let black_to_move =
            Position::from_fen("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1")
                .expect("FEN should parse");
        let white_view = evaluate(&white_to_move, &weights);
        let black_view = evaluate(&black_to_move, &weights);
        assert!(white_view > 500, "white should be clearly ahead: {white_view}");
        assert_eq!(white_view, -black_view);
    }

    #[test]
    fn phase_drops_as_material_comes_off() {
        let endgame = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1")
            .expect("FEN should parse");
        assert_eq!(game_phase(&endgame), 0);

        let queens_only = Position::from_fen("3qk3/8/8/8/8/8/8/3QK3 w - - 0 1")
            .expect("FEN should parse");
        assert_eq!(game_phase(&queens_only), 8);
    }

    #[test]
    fn extra_promoted_queens_cannot_overflow_the_phase() {
        let position = Position::from_fen("QQQQk3/QQQQ4/8/8/8/8/8/4K3 w - - 0 1")
            .expect("FEN should parse");
        assert_eq!(game_phase(&position), MAX_PHASE);
    }

    #[test]
    fn material_evaluator_ignores_placement() {
        let centered =
            Position::from_fen("4k3/8/8/8/3N4/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let cornered =
            Position::from_fen("4k3/8/8/8/8/8/8/N3K3 w - - 0 1").expect("FEN should parse");
        let scorer = MaterialEvaluator;
        assert_eq!(scorer.evaluate(&centered), scorer.evaluate(&cornered));
        assert_eq!(scorer.evaluate(&centered), PIECE_VALUES[PieceKind::Knight.index()]);
    }

    #[test]
    fn tapered_evaluator_matches_the_free_function() {
        let position = Position::new_game();
        let scorer = TaperedEvaluator::default();
        assert_eq!(
            scorer.evaluate(&position),
            evaluate(&position, &scorer.weights)
        );
    }

    #[test]
    fn centralized_knight_beats_cornered_knight() {
        let weights = EvalWeights::default();
        let centered =
            Position::from_fen("4k3/8/8/8/3N4/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let cornered =
            Position::from_fen("4k3/8/8/8/8/8/8/N3K3 w - - 0 1").expect("FEN should parse");
        assert!(evaluate(&centered, &weights) > evaluate(&cornered, &weights));
    }
}
