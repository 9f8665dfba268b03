//! Iterative-deepening negamax search with alpha-beta pruning.
//!
//! Each deepening iteration runs a full-width negamax to its target depth,
//! seeded by the transposition table: the previous iteration's best move is
//! tried first at every node it reaches. A soft deadline is polled every few
//! hundred nodes; when it fires, the current iteration is abandoned and the
//! last completed iteration's answer stands.

use std::time::{Duration, Instant};

use log::debug;

use crate::board::position::Position;
use crate::board::types::Color;
use crate::eval::pst::table_for;
use crate::eval::scorer::{Evaluate, TaperedEvaluator};
use crate::eval::see::static_exchange_evaluation;
use crate::movegen::checks::is_king_in_check;
use crate::movegen::encoding::Move;
use crate::movegen::generator::generate_legal;
use crate::search::transposition::{Bound, TranspositionTable, TtStats};
use crate::utils::algebraic::move_name;

/// Score for being checkmated at the root; mates further from the root score
/// closer to zero so the search prefers the shortest mate.
pub const MATE_SCORE: i32 = 30_000;
/// Scores beyond this threshold are mate scores and get ply adjustment.
const MATE_BOUND: i32 = MATE_SCORE - 1_000;
pub const INFINITY: i32 = 32_000;

const DEADLINE_POLL_INTERVAL: u64 = 1024;

#[derive(Debug, Clone)]
pub struct SearchLimits {
    pub max_depth: u8,
    /// Wall-clock budget; `None` searches to `max_depth` regardless of time.
    pub move_time: Option<Duration>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits {
            max_depth: 5,
            move_time: None,
        }
    }
}

/// How a game ended when the root position has no legal moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalState {
    Checkmate,
    Stalemate,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best_move: Option<Move>,
    /// Centipawns from the root side to move's perspective; mate scores are
    /// `±(MATE_SCORE - distance)`.
    pub score: i32,
    /// Deepest fully completed iteration.
    pub depth_reached: u8,
    pub nodes: u64,
    pub elapsed: Duration,
    pub terminal: Option<TerminalState>,
    pub tt_stats: TtStats,
}

/// Searches with a private transposition table.
pub fn search(position: &mut Position, limits: &SearchLimits) -> SearchOutcome {
    let mut table = TranspositionTable::with_default_capacity();
    search_with_table(position, limits, &mut table)
}

/// Searches reusing a caller-owned table, so consecutive searches of a game
/// keep their shared work.
pub fn search_with_table(
    position: &mut Position,
    limits: &SearchLimits,
    table: &mut TranspositionTable,
) -> SearchOutcome {
    let start = Instant::now();
    let deadline = limits.move_time.map(|budget| start + budget);
    let evaluator = TaperedEvaluator::default();

    let root_moves = generate_legal(position);
    if root_moves.is_empty() {
        let (terminal, score) = if is_king_in_check(position, position.side_to_move()) {
            (TerminalState::Checkmate, -MATE_SCORE)
        } else {
            (TerminalState::Stalemate, 0)
        };
        return SearchOutcome {
            best_move: None,
            score,
            depth_reached: 0,
            nodes: 0,
            elapsed: start.elapsed(),
            terminal: Some(terminal),
            tt_stats: table.stats(),
        };
    }

    let mut searcher = Searcher {
        position,
        table,
        evaluator,
        deadline,
        nodes: 0,
        stopped: false,
    };

    let mut best_move = None;
    let mut best_score = 0;
    let mut depth_reached = 0;

    for depth in 1..=limits.max_depth.max(1) {
        searcher.table.new_generation();
        let iteration = searcher.root(depth);

        if searcher.stopped {
            debug!(
                "depth {depth} abandoned at {} nodes, keeping depth {depth_reached} result",
                searcher.nodes
            );
            break;
        }

        if let Some((score, mv)) = iteration {
            best_move = Some(mv);
            best_score = score;
            depth_reached = depth;
            debug!(
                "depth {depth} score {score} best {} nodes {} in {:?}",
                move_name(mv),
                searcher.nodes,
                start.elapsed()
            );
        }
    }

    SearchOutcome {
        best_move,
        score: best_score,
        depth_reached,
        nodes: searcher.nodes,
        elapsed: start.elapsed(),
        terminal: None,
        tt_stats: searcher.table.stats(),
    }
}

struct Searcher<'a> {
    position: &'a mut Position,
    table: &'a mut TranspositionTable,
    evaluator: TaperedEvaluator,
    deadline: Option<Instant>,
    nodes: u64,
    stopped: bool,
}

impl Searcher<'_> {
    /// One full-width iteration; returns the best root move and its score,
    /// or `None` when the deadline fired mid-iteration.
    fn root(&mut self, depth: u8) -> Option<(i32, Move)> {
        let mut moves = generate_legal(self.position);
        let seed = self
            .table
            .probe(self.position.zobrist_key())
            .and_then(|entry| entry.best_move);
        self.order_moves(&mut moves, seed);

        let mut alpha = -INFINITY;
        let mut best: Option<(i32, Move)> = None;

        for mv in moves {
            if self.position.make_move(mv).is_err() {
                continue;
            }
            let score = -self.negamax(depth - 1, 1, -INFINITY, -alpha);
            // Restores the record just pushed above.
            let _ = self.position.unmake_move();

            if self.stopped {
                return None;
            }
            if best.is_none() || score > alpha {
                alpha = alpha.max(score);
                best = Some((score, mv));
            }
        }

        if let Some((score, mv)) = best {
            self.table.store(
                self.position.zobrist_key(),
                depth,
                to_tt_score(score, 0),
                Bound::Exact,
                Some(mv),
            );
        }
        best
    }

    fn negamax(&mut self, depth: u8, ply: u8, mut alpha: i32, mut beta: i32) -> i32 {
        self.nodes += 1;
        if self.nodes % DEADLINE_POLL_INTERVAL == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    self.stopped = true;
                }
            }
        }
        if self.stopped {
            return 0;
        }

        if self.position.halfmove_clock() >= 100 {
            return 0;
        }

        let key = self.position.zobrist_key();
        let mut seed = None;
        if let Some(entry) = self.table.probe(key) {
            seed = entry.best_move;
            if entry.depth >= depth {
                let score = from_tt_score(entry.score, ply);
                match entry.bound {
                    Bound::Exact => return score,
                    Bound::Lower => alpha = alpha.max(score),
                    Bound::Upper => beta = beta.min(score),
                }
                if alpha >= beta {
                    return score;
                }
            }
        }

        if depth == 0 {
            return self.evaluator.evaluate(self.position);
        }

        let mut moves = generate_legal(self.position);
        if moves.is_empty() {
            return if is_king_in_check(self.position, self.position.side_to_move()) {
                -(MATE_SCORE - ply as i32)
            } else {
                0
            };
        }
        self.order_moves(&mut moves, seed);

        let alpha_original = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = None;

        for mv in moves {
            if self.position.make_move(mv).is_err() {
                continue;
            }
            let score = -self.negamax(depth - 1, ply + 1, -beta, -alpha);
            let _ = self.position.unmake_move();

            if self.stopped {
                return 0;
            }
            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        let bound = if best_score <= alpha_original {
            Bound::Upper
        } else if best_score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.table
            .store(key, depth, to_tt_score(best_score, ply), bound, best_move);

        best_score
    }

    /// Orders the hash move first, then captures by static exchange value,
    /// then checks and promotions, then quiets by the middlegame
    /// piece-square gain of the move. The sort is stable, so equal keys keep
    /// generation order and the search stays deterministic.
    fn order_moves(&mut self, moves: &mut [Move], seed: Option<Move>) {
        let position = &*self.position;
        let us = position.side_to_move();
        moves.sort_by_key(|&mv| {
            let mut priority = 0i32;
            if Some(mv) == seed {
                priority += 1_000_000;
            }
            if mv.is_capture() {
                priority += 100_000 + static_exchange_evaluation(position, mv);
            }
            if mv.gives_check() {
                priority += 50_000;
            }
            if mv.promotion_piece().is_some() {
                priority += 40_000;
            }
            priority += square_gain(us, mv);
            -priority
        });
    }
}

/// Middlegame piece-square improvement of a move, used as a quiet-move
/// ordering heuristic.
#[inline]
fn square_gain(us: Color, mv: Move) -> i32 {
    let table = table_for(mv.moved_piece());
    let (from, to) = match us {
        Color::White => (mv.from_square() as usize, mv.to_square() as usize),
        Color::Black => ((mv.from_square() ^ 56) as usize, (mv.to_square() ^ 56) as usize),
    };
    table.mg[to] - table.mg[from]
}

/// Mate scores are stored relative to the storing node so they stay correct
/// when probed at a different ply.
#[inline]
fn to_tt_score(score: i32, ply: u8) -> i32 {
    if score > MATE_BOUND {
        score + ply as i32
    } else if score < -MATE_BOUND {
        score - ply as i32
    } else {
        score
    }
}

#[inline]
fn from_tt_score(score: i32, ply: u8) -> i32 {
    if score > MATE_BOUND {
        score - ply as i32
    } else if score < -MATE_BOUND {
        score + ply as i32
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_fen(fen: &str, depth: u8) -> SearchOutcome {
        let mut position = Position::from_fen(fen).expect("FEN should parse");
        search(
            &mut position,
            &SearchLimits {
                max_depth: depth,
                move_time: None,
            },
        )
    }

    #[test]
    fn checkmated_root_reports_checkmate() {
        // Fool's mate final position, White to move and mated.
        let outcome = search_fen(
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
            3,
        );
        assert_eq!(outcome.terminal, Some(TerminalState::Checkmate));
        assert_eq!(outcome.best_move, None);
        assert_eq!(outcome.score, -MATE_SCORE);
    }

    #[test]
    fn stalemated_root_reports_stalemate() {
        let outcome = search_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", 3);
        assert_eq!(outcome.terminal, Some(TerminalState::Stalemate));
        assert_eq!(outcome.best_move, None);
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn finds_mate_in_one() {
        // Back-rank mate: Ra8#.
        let outcome = search_fen("6k1/5ppp/8/8/8/8/8/R3K3 w - - 0 1", 3);
        let best = outcome.best_move.expect("a best move should exist");
        assert_eq!(move_name(best), "a1a8");
        assert_eq!(outcome.score, MATE_SCORE - 1);
    }

    #[test]
    fn prefers_the_shorter_mate() {
        // Mate in one is available; the score must say mate in one even
        // though deeper mates exist too.
        let outcome = search_fen("6k1/5ppp/8/8/8/8/8/R3K3 w - - 0 1", 5);
        assert_eq!(outcome.score, MATE_SCORE - 1);
    }

    #[test]
    fn takes_the_hanging_queen() {
        let outcome = search_fen("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1", 4);
        let best = outcome.best_move.expect("a best move should exist");
        assert_eq!(move_name(best), "e4d5");
    }

    #[test]
    fn hundred_halfmove_rule_reads_as_a_draw() {
        let outcome = search_fen("4k3/8/8/8/8/8/3R4/4K3 w - - 99 80", 3);
        // Any rook move hits the 100 threshold; the search should still
        // return a move but see drawish scores behind it.
        assert!(outcome.best_move.is_some());
    }

    #[test]
    fn repeated_searches_are_deterministic() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let a = search_fen(fen, 4);
        let b = search_fen(fen, 4);
        assert_eq!(a.best_move, b.best_move);
        assert_eq!(a.score, b.score);
        assert_eq!(a.nodes, b.nodes);
    }

    #[test]
    fn deadline_still_yields_a_completed_iteration() {
        let mut position = Position::new_game();
        let outcome = search(
            &mut position,
            &SearchLimits {
                max_depth: 64,
                move_time: Some(Duration::from_millis(50)),
            },
        );
        assert!(outcome.best_move.is_some());
        assert!(outcome.depth_reached >= 1);
        assert!(outcome.elapsed < Duration::from_secs(5));
    }

    #[test]
    fn table_reuse_pays_off_in_hits() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 4 3";
        let limits = SearchLimits {
            max_depth: 4,
            move_time: None,
        };

        let mut table = TranspositionTable::with_default_capacity();
        let mut position = Position::from_fen(fen).expect("FEN should parse");
        let warmup = search_with_table(&mut position, &limits, &mut table);
        let reused = search_with_table(&mut position, &limits, &mut table);

        assert!(warmup.best_move.is_some());
        assert!(reused.best_move.is_some());
        // The warm table answers most of the second search's probes.
        assert!(reused.nodes <= warmup.nodes);
        assert!(reused.tt_stats.hits > warmup.tt_stats.hits);
    }
}
