use log::{error, info};
use std::env;
use std::process;

use tron_arena::arena::Arena;
use tron_arena::config::Config;
use tron_arena::error::ArenaError;
use tron_arena::source::{Console, MoveSource, PlayerSource};
use tron_arena::types::PlayerId;

#[tokio::main]
async fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    info!("Starting arena...");

    if let Err(e) = run().await {
        error!("{}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ArenaError> {
    // An explicit path must load; the implicit Arena.toml may fall back to defaults
    let config = match env::var("ARENA_CONFIG") {
        Ok(path) => Config::from_file(path)?,
        Err(_) => Config::load_or_default(),
    };
    config.validate()?;

    let console = Console::stdio();
    let mut one =
        PlayerSource::from_config(PlayerId::One, &config.player_one, &config.timing, &console)?;
    let mut two =
        PlayerSource::from_config(PlayerId::Two, &config.player_two, &config.timing, &console)?;

    info!("{} is {}, {} is {}", PlayerId::One, one.name(), PlayerId::Two, two.name());

    let report = Arena::new(&config).run(&mut one, &mut two).await?;

    println!("{}", report.final_state);
    match report.winner() {
        Some(winner) => println!("{} wins after {} ticks", winner, report.ticks),
        None => println!("Draw after {} ticks ({})", report.ticks, report.outcome),
    }
    Ok(())
}
