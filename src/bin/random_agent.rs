// Demo agent for the arena's line protocol
//
// Usage:
//   random-agent [random|cautious] [seed]
//
// Reads one JSON view per line on stdin and answers each with a move code on stdout.
// Logs go to stderr, which the arena collects when the match ends.

use log::{error, info, warn};
use std::env;
use std::io::{self, BufRead, Write};
use std::process;

use tron_arena::strategy;
use tron_arena::types::SENTINEL_MOVE;
use tron_arena::view::StateView;

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let mut args = env::args().skip(1);
    let name = args.next().unwrap_or_else(|| "cautious".to_string());
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => Some(seed),
        Some(Err(e)) => {
            eprintln!("Invalid seed: {}", e);
            process::exit(2);
        }
        None => None,
    };

    let Some(mut strategy) = strategy::by_name(&name, seed) else {
        eprintln!("Unknown strategy '{}' (expected random or cautious)", name);
        process::exit(2);
    };

    info!("Agent ready with {} strategy", strategy.name());

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut turns = 0u64;

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read request: {}", e);
                break;
            }
        };

        let reply = match StateView::from_line(&line) {
            Ok(view) => strategy.choose_move(&view),
            Err(e) => {
                warn!("Could not decode request: {}", e);
                SENTINEL_MOVE
            }
        };

        if writeln!(stdout, "{}", reply).and_then(|_| stdout.flush()).is_err() {
            error!("Arena closed the reply channel");
            break;
        }
        turns += 1;
    }

    info!("Input closed after {} turns, exiting", turns);
}
