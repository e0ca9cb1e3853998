// Human seat: prompts on a console until a move between 1 and 4 is typed

use log::{debug, error, warn};
use parking_lot::Mutex;
use std::io::{BufRead, BufReader, Write};
use std::sync::Arc;

use super::MoveSource;
use crate::player::Player;
use crate::types::{PlayerId, SENTINEL_MOVE};

const PROMPT: &str = "\nLeft: 1\nUp: 2\nRight: 3\nDown: 4\n";

struct ConsoleIo {
    input: Box<dyn BufRead + Send>,
    output: Box<dyn Write + Send>,
}

/// A terminal shared by every human seat.
/// Holding the lock for a whole prompt keeps two humans from reading each other's keys.
#[derive(Clone)]
pub struct Console {
    io: Arc<Mutex<ConsoleIo>>,
}

impl Console {
    pub fn stdio() -> Self {
        Self::with_io(BufReader::new(std::io::stdin()), std::io::stdout())
    }

    pub fn with_io<R, W>(input: R, output: W) -> Self
    where
        R: BufRead + Send + 'static,
        W: Write + Send + 'static,
    {
        Console {
            io: Arc::new(Mutex::new(ConsoleIo {
                input: Box::new(input),
                output: Box::new(output),
            })),
        }
    }

    /// Blocks until a valid move is typed. Returns SENTINEL_MOVE only when the
    /// input is closed or unreadable.
    fn read_move(&self, player: PlayerId) -> i32 {
        let mut io = self.io.lock();
        let ConsoleIo { input, output } = &mut *io;

        loop {
            show(output, &format!("{}Enter your move ({}): ", PROMPT, player));

            let mut line = String::new();
            match input.read_line(&mut line) {
                Ok(0) => {
                    warn!("Console closed while waiting for {}", player);
                    return SENTINEL_MOVE;
                }
                Ok(_) => match line.trim().parse::<i32>() {
                    Ok(m) if Player::is_valid_move(m) => return m,
                    Ok(_) => show(output, "Invalid move. Please enter a number between 1 and 4.\n"),
                    Err(_) => show(
                        output,
                        "Invalid input. Please enter a valid integer between 1 and 4.\n",
                    ),
                },
                Err(e) => {
                    error!("Failed to read console input for {}: {}", player, e);
                    return SENTINEL_MOVE;
                }
            }
        }
    }
}

fn show(output: &mut dyn Write, text: &str) {
    if let Err(e) = output.write_all(text.as_bytes()).and_then(|_| output.flush()) {
        debug!("Console write failed: {}", e);
    }
}

pub struct HumanSource {
    player: PlayerId,
    console: Console,
}

impl HumanSource {
    pub fn new(player: PlayerId, console: Console) -> Self {
        HumanSource { player, console }
    }
}

impl MoveSource for HumanSource {
    fn name(&self) -> &str {
        "human"
    }

    async fn initialize(&mut self) -> bool {
        true
    }

    async fn get_move(&mut self, _state_view: &str) -> i32 {
        let console = self.console.clone();
        let player = self.player;

        // Console reads block, so they run off the async workers
        match tokio::task::spawn_blocking(move || console.read_move(player)).await {
            Ok(m) => m,
            Err(e) => {
                error!("Console task for {} failed: {}", player, e);
                SENTINEL_MOVE
            }
        }
    }

    async fn cleanup(&mut self) {}
}
