// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::Result;

use super::core::EngineCore;
use super::sink::ReplySink;
use super::PipelineEvent;

/// Drives the engine core in response to `PipelineEvent`s and delegates
/// reply delivery to a `ReplySink`.
///
/// Events are handled strictly one at a time, so a controller never sees
/// overlapping lifecycle calls.
pub struct Runtime<S: ReplySink> {
    core: EngineCore,
    event_rx: mpsc::Receiver<PipelineEvent>,
    sink: S,
}

impl<S: ReplySink> fmt::Debug for Runtime<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<S: ReplySink> Runtime<S> {
    pub fn new(core: EngineCore, event_rx: mpsc::Receiver<PipelineEvent>, sink: S) -> Self {
        Self {
            core,
            event_rx,
            sink,
        }
    }

    /// Main event loop.
    ///
    /// - Consumes `PipelineEvent`s from `event_rx`.
    /// - Feeds them into the core.
    /// - Sends the reply for each event before reading the next one.
    pub async fn run(mut self) -> Result<()> {
        info!("livebridge runtime started");

        while let Some(event) = self.event_rx.recv().await {
            debug!(?event, "runtime received event");

            let step = self.core.step(event).await;
            self.sink.send(step.reply).await?;

            if !step.keep_running {
                info!("shutdown requested; stopping runtime");
                break;
            }
        }

        info!("runtime exiting");
        Ok(())
    }
}
