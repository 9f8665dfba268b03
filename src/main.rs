//! One-shot analysis command line.
//!
//! Usage: `quince_chess [FEN|startpos] [depth] [movetime_ms]`
//!
//! Prints the board, the static evaluation, and the search result for the
//! given position. Set `RUST_LOG=debug` to see per-iteration search lines.

use std::env;
use std::process::ExitCode;
use std::time::Duration;

use log::error;

use quince_chess::board::position::Position;
use quince_chess::eval::scorer::{evaluate, EvalWeights};
use quince_chess::movegen::generator::generate_legal;
use quince_chess::search::alpha_beta::{search, SearchLimits, TerminalState};
use quince_chess::utils::algebraic::move_name;
use quince_chess::utils::render_position::render_board;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let fen = match args.first().map(String::as_str) {
        None | Some("startpos") => None,
        Some(fen) => Some(fen.to_string()),
    };

    let mut position = match fen {
        None => Position::new_game(),
        Some(fen) => match Position::from_fen(&fen) {
            Ok(position) => position,
            Err(err) => {
                error!("{err}");
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        },
    };

    let max_depth = args
        .get(1)
        .and_then(|raw| raw.parse::<u8>().ok())
        .unwrap_or(6);
    let move_time = args
        .get(2)
        .and_then(|raw| raw.parse::<u64>().ok())
        .map(Duration::from_millis);

    print!("{}", render_board(&position));

    let legal = generate_legal(&mut position);
    println!("legal moves: {}", legal.len());
    println!(
        "static eval: {} cp",
        evaluate(&position, &EvalWeights::default())
    );

    let limits = SearchLimits {
        max_depth,
        move_time,
    };
    let outcome = search(&mut position, &limits);

    match outcome.terminal {
        Some(TerminalState::Checkmate) => {
            println!("checkmate, side to move loses");
            return ExitCode::SUCCESS;
        }
        Some(TerminalState::Stalemate) => {
            println!("stalemate, draw");
            return ExitCode::SUCCESS;
        }
        None => {}
    }

    println!(
        "depth {} score {} nodes {} in {:?}",
        outcome.depth_reached, outcome.score, outcome.nodes, outcome.elapsed
    );
    let stats = outcome.tt_stats;
    println!(
        "tt: {} hits / {} misses ({} index collisions)",
        stats.hits, stats.misses, stats.collisions
    );
    match outcome.best_move {
        Some(best) => println!("best move: {}", move_name(best)),
        None => println!("no move available"),
    }

    ExitCode::SUCCESS
}
