//! JSON-lines transport: commands in, actions out.
//!
//! Each input line is one [`Command`]; each output line is one [`Action`].
//! Malformed input lines are logged and skipped. Blank lines are ignored.

#[cfg(test)]
#[path = "stdio_test.rs"]
mod stdio_test;

use canvas::bus::Command;
use canvas::engine::Action;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{error, warn};

/// Line counts from one input stream.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadStats {
    pub accepted: usize,
    pub rejected: usize,
}

/// Decode commands from `reader` until EOF (or until the session stops listening).
pub async fn read_commands<R>(reader: R, commands: mpsc::Sender<Command>) -> ReadStats
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut stats = ReadStats::default();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "command stream read failed");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Command>(line) {
            Ok(cmd) => {
                if commands.send(cmd).await.is_err() {
                    warn!("session closed; dropping remaining input");
                    break;
                }
                stats.accepted += 1;
            }
            Err(e) => {
                warn!(error = %e, line = stats.accepted + stats.rejected + 1, "ignoring malformed command");
                stats.rejected += 1;
            }
        }
    }
    stats
}

/// Encode actions to `out`, one JSON object per line, flushing after each.
///
/// # Errors
///
/// Returns the first write failure.
pub async fn write_actions<W>(mut actions: mpsc::Receiver<Action>, mut out: W) -> std::io::Result<W>
where
    W: AsyncWrite + Unpin,
{
    while let Some(action) = actions.recv().await {
        let mut line = serde_json::to_vec(&action).map_err(std::io::Error::other)?;
        line.push(b'\n');
        out.write_all(&line).await?;
        out.flush().await?;
    }
    Ok(out)
}
