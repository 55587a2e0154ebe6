// src/bridge/control.rs

//! Out-of-band control commands for the session worker.
//!
//! The worker only ever sees an `mpsc` channel of `ControlCommand`s, so the
//! input transport is swappable: the binary feeds it from stdin, tests feed
//! it directly.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// The full control vocabulary of the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Exit the session loop; the terminal sensor reset follows.
    Stop,
    /// Rewrite every sensor output to the sentinel without touching the
    /// connection.
    Reset,
}

impl ControlCommand {
    /// Parses one line of operator input, case-insensitively.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "stop" => Some(Self::Stop),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

/// Spawns the stdin transport: reads operator lines and forwards recognized
/// commands. The task ends on EOF, after forwarding `stop`, or when the
/// receiving side is gone.
pub fn spawn_stdin_listener(tx: mpsc::Sender<ControlCommand>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let Some(command) = ControlCommand::parse(trimmed) else {
                        warn!("Unknown control command {trimmed:?}. Known commands: stop, reset.");
                        continue;
                    };
                    if tx.send(command).await.is_err() || command == ControlCommand::Stop {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Control input error: {e}");
                    break;
                }
            }
        }
        debug!("Control listener finished.");
    })
}
