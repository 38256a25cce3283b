// src/engine/sink.rs

//! Where replies to the pipeline go.
//!
//! The runtime talks to a `ReplySink` instead of writing to stdout directly,
//! so tests can collect replies in memory.

use std::future::Future;
use std::pin::Pin;

use tokio::io::{AsyncWriteExt, Stdout};

use crate::engine::PipelineReply;
use crate::errors::Result;

/// Destination for pipeline replies.
pub trait ReplySink: Send {
    fn send(
        &mut self,
        reply: PipelineReply,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Writes each reply as one JSON line on STDOUT.
pub struct StdoutReplySink {
    out: Stdout,
}

impl StdoutReplySink {
    pub fn new() -> Self {
        Self {
            out: tokio::io::stdout(),
        }
    }
}

impl Default for StdoutReplySink {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplySink for StdoutReplySink {
    fn send(
        &mut self,
        reply: PipelineReply,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let mut line = serde_json::to_vec(&reply)?;
            line.push(b'\n');
            self.out.write_all(&line).await?;
            self.out.flush().await?;
            Ok(())
        })
    }
}
