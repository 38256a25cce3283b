// src/engine/input.rs

//! Turns JSON lines from the build pipeline into [`PipelineEvent`]s.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::engine::PipelineEvent;
use crate::errors::Result;

/// Read events from `reader` until EOF and forward them to `tx`.
///
/// - Blank lines are skipped.
/// - Lines that do not parse become [`PipelineEvent::Malformed`] so the
///   pipeline still gets a reply for them.
/// - EOF sends [`PipelineEvent::Shutdown`].
///
/// Returns early (without error) if the runtime side of the channel is gone.
pub async fn forward_events<R>(reader: R, tx: mpsc::Sender<PipelineEvent>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let event = match serde_json::from_str::<PipelineEvent>(trimmed) {
            Ok(event) => event,
            Err(err) => {
                warn!(error = %err, "ignoring malformed pipeline event");
                PipelineEvent::Malformed {
                    message: format!("malformed event: {err}"),
                }
            }
        };

        if tx.send(event).await.is_err() {
            debug!("runtime channel closed; stopping input reader");
            return Ok(());
        }
    }

    debug!("pipeline input closed");
    let _ = tx.send(PipelineEvent::Shutdown).await;
    Ok(())
}

/// Spawn a task forwarding STDIN events to `tx`.
pub fn spawn_stdin_reader(tx: mpsc::Sender<PipelineEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let stdin = BufReader::new(tokio::io::stdin());
        if let Err(err) = forward_events(stdin, tx).await {
            warn!(error = %err, "failed to read pipeline events from stdin");
        }
    })
}
