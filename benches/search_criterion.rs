use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use quince_chess::board::position::Position;
use quince_chess::eval::scorer::{evaluate, EvalWeights};
use quince_chess::search::alpha_beta::{search, SearchLimits};

const MIDGAME_FEN: &str =
    "r1bq1rk1/pp2bppp/2n1pn2/3p4/2PP4/2N1PN2/PP2BPPP/R1BQ1RK1 w - - 4 8";

fn search_midgame(c: &mut Criterion) {
    let limits = SearchLimits {
        max_depth: 4,
        move_time: None,
    };

    // Guard: the search must actually produce a move for this position.
    let mut position = Position::from_fen(MIDGAME_FEN).expect("FEN should parse");
    assert!(search(&mut position, &limits).best_move.is_some());

    c.bench_function("search depth 4 midgame", |b| {
        b.iter(|| {
            let mut position = Position::from_fen(MIDGAME_FEN).expect("FEN should parse");
            black_box(search(&mut position, &limits))
        })
    });
}

fn evaluate_midgame(c: &mut Criterion) {
    let position = Position::from_fen(MIDGAME_FEN).expect("FEN should parse");
    let weights = EvalWeights::default();

    c.bench_function("evaluate midgame", |b| {
        b.iter(|| black_box(evaluate(black_box(&position), &weights)))
    });
}

criterion_group!(benches, search_midgame, evaluate_midgame);
criterion_main!(benches);
