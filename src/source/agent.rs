// External agent seat: a child process speaking a line protocol
//
// Request: the JSON view on one line. Reply: one line holding an integer.
// Stderr is forwarded to the log line by line for as long as the agent runs.
// Shutdown: close stdin, wait for exit, kill if still alive, reap.

use log::{debug, error, info, warn};
use std::io;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use tokio::task::JoinHandle;
use tokio::time::timeout;

use super::MoveSource;
use crate::types::{PlayerId, SENTINEL_MOVE};

const DEFAULT_CLEANUP_TIMEOUT: Duration = Duration::from_secs(2);

pub struct SubprocessAgent {
    player: PlayerId,
    command: Vec<String>,
    label: String,
    move_timeout: Option<Duration>,
    cleanup_timeout: Duration,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout: Option<BufReader<ChildStdout>>,
    // Requests written whose reply has not been read yet
    unanswered: usize,
    stderr_log: Option<JoinHandle<()>>,
}

impl SubprocessAgent {
    /// # Arguments
    /// * `player` - The seat this agent plays
    /// * `command` - Program followed by its arguments
    pub fn new(player: PlayerId, command: Vec<String>) -> Self {
        let label = command.last().cloned().unwrap_or_default();
        SubprocessAgent {
            player,
            command,
            label,
            move_timeout: None,
            cleanup_timeout: DEFAULT_CLEANUP_TIMEOUT,
            child: None,
            stdin: None,
            stdout: None,
            unanswered: 0,
            stderr_log: None,
        }
    }

    /// Bounds the wait for each reply. None waits for as long as the agent takes.
    pub fn with_move_timeout(mut self, move_timeout: Option<Duration>) -> Self {
        self.move_timeout = move_timeout;
        self
    }

    pub fn with_cleanup_timeout(mut self, cleanup_timeout: Duration) -> Self {
        self.cleanup_timeout = cleanup_timeout;
        self
    }

    pub fn is_running(&self) -> bool {
        self.child.is_some()
    }

    /// Writes one request line and reads its reply line.
    ///
    /// Replies owed to earlier requests that timed out are read and dropped first,
    /// so the returned line always answers `state_view`. The counter only changes
    /// once a whole line has gone out or come in, which keeps it exact when the
    /// future is cancelled midway.
    /// Ok(None) means the agent closed its output.
    async fn exchange(
        stdin: &mut ChildStdin,
        stdout: &mut BufReader<ChildStdout>,
        unanswered: &mut usize,
        state_view: &str,
    ) -> io::Result<Option<String>> {
        stdin.write_all(format!("{}\n", state_view).as_bytes()).await?;
        stdin.flush().await?;
        *unanswered += 1;

        let mut line = String::new();
        while *unanswered > 0 {
            line.clear();
            if stdout.read_line(&mut line).await? == 0 {
                return Ok(None);
            }
            *unanswered -= 1;
            if *unanswered > 0 {
                debug!("Dropping late reply {:?}", line.trim());
            }
        }
        Ok(Some(line))
    }

    fn parse_reply(&self, line: &str) -> i32 {
        let reply = line.trim();
        match reply.parse::<i32>() {
            Ok(m) => {
                info!("Agent {} ({}) replied {}", self.label, self.player, m);
                m
            }
            Err(_) => {
                warn!(
                    "Agent {} ({}) sent a non-numeric reply: {:?}",
                    self.label, self.player, reply
                );
                SENTINEL_MOVE
            }
        }
    }

    fn log_stderr(&self, stderr: ChildStderr) -> JoinHandle<()> {
        let label = self.label.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => warn!("[{} stderr] {}", label, line),
                    Ok(None) => break,
                    Err(e) => {
                        error!("Failed to read stderr of agent {}: {}", label, e);
                        break;
                    }
                }
            }
        })
    }

    async fn stop_stderr_log(&mut self) {
        let Some(mut task) = self.stderr_log.take() else {
            return;
        };

        if timeout(self.cleanup_timeout, &mut task).await.is_err() {
            warn!(
                "Agent {} kept stderr open past {:?}",
                self.label, self.cleanup_timeout
            );
            task.abort();
        }
    }
}

impl MoveSource for SubprocessAgent {
    fn name(&self) -> &str {
        &self.label
    }

    async fn initialize(&mut self) -> bool {
        let Some((program, args)) = self.command.split_first() else {
            error!("No agent command configured for {}", self.player);
            return false;
        };

        let spawned = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        match spawned {
            Ok(mut child) => {
                self.stdin = child.stdin.take();
                self.stdout = child.stdout.take().map(BufReader::new);
                self.unanswered = 0;
                self.stderr_log = child.stderr.take().map(|e| self.log_stderr(e));
                self.child = Some(child);
                info!("Agent {} launched for {}", self.label, self.player);
                true
            }
            Err(e) => {
                error!("Error launching agent {} for {}: {}", self.label, self.player, e);
                false
            }
        }
    }

    async fn get_move(&mut self, state_view: &str) -> i32 {
        let (Some(stdin), Some(stdout)) = (self.stdin.as_mut(), self.stdout.as_mut()) else {
            error!(
                "Agent {} ({}) is not running or its pipes are missing",
                self.label, self.player
            );
            return SENTINEL_MOVE;
        };

        let exchange = Self::exchange(stdin, stdout, &mut self.unanswered, state_view);
        let reply = match self.move_timeout {
            Some(limit) => match timeout(limit, exchange).await {
                Ok(reply) => reply,
                Err(_) => {
                    warn!(
                        "Agent {} ({}) did not answer within {:?}; its late reply will be dropped",
                        self.label, self.player, limit
                    );
                    return SENTINEL_MOVE;
                }
            },
            None => exchange.await,
        };

        match reply {
            Ok(Some(line)) => self.parse_reply(&line),
            Ok(None) => {
                warn!("No output received from agent {} ({})", self.label, self.player);
                SENTINEL_MOVE
            }
            Err(e) => {
                error!(
                    "Error talking to agent {} ({}): {}",
                    self.label, self.player, e
                );
                SENTINEL_MOVE
            }
        }
    }

    async fn cleanup(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        info!("Terminating agent {}...", self.label);

        // Closing stdin is the agent's signal to stop
        drop(self.stdin.take());

        match timeout(self.cleanup_timeout, child.wait()).await {
            Ok(Ok(status)) => info!("Agent {} exited with {}", self.label, status),
            Ok(Err(e)) => error!("Failed to reap agent {}: {}", self.label, e),
            Err(_) => {
                warn!(
                    "Agent {} did not exit within {:?}; killing it",
                    self.label, self.cleanup_timeout
                );
                if let Err(e) = child.kill().await {
                    error!("Failed to kill agent {}: {}", self.label, e);
                }
            }
        }

        drop(self.stdout.take());
        self.unanswered = 0;
        self.stop_stderr_log().await;
        info!("Agent {} cleanup complete.", self.label);
    }
}
