// src/engine/mod.rs

//! Pipeline driver for livebridge.
//!
//! A build tool talks to the bridge by writing one JSON event per line to
//! STDIN and reading exactly one JSON reply per event from STDOUT:
//!
//! ```text
//! {"event":"watch-run"}                       -> {"reply":"started",...}
//! {"event":"done","build":{"id":..,"assets":{..}}} -> {"reply":"built",...}
//! {"event":"failed"}                          -> {"reply":"reset",...}
//! {"event":"startup","source":"..."}          -> {"reply":"startup",...}
//! ```
//!
//! The per-instance semantics live in [`crate::controller`]. `core` routes
//! events to controllers and produces replies; [`runtime`] is the async
//! shell that reads events from a channel and writes replies to a
//! [`ReplySink`].

use serde::{Deserialize, Serialize};

use crate::controller::{BuildOutput, BuildReport, StartOutcome};

/// Canonical instance name type used throughout the engine.
pub type InstanceName = String;

/// Events flowing from the build pipeline into the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum PipelineEvent {
    /// The pipeline is about to (re)build in watch mode.
    WatchRun {
        #[serde(default)]
        instance: Option<InstanceName>,
    },
    /// A build finished successfully.
    Done {
        #[serde(default)]
        instance: Option<InstanceName>,
        build: BuildOutput,
    },
    /// A build failed.
    Failed {
        #[serde(default)]
        instance: Option<InstanceName>,
    },
    /// Output-template hook: return `source`, possibly with the bootstrap
    /// snippet prepended.
    Startup {
        #[serde(default)]
        instance: Option<InstanceName>,
        source: String,
    },
    /// Stop the runtime (also sent on EOF and Ctrl-C).
    Shutdown,
    /// An input line that could not be parsed.
    #[serde(skip_deserializing)]
    Malformed { message: String },
}

/// Replies written back to the pipeline, one per event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reply", rename_all = "kebab-case")]
pub enum PipelineReply {
    Started {
        instance: InstanceName,
        outcome: StartOutcome,
    },
    Built {
        instance: InstanceName,
        report: BuildReport,
    },
    Reset {
        instance: InstanceName,
    },
    Startup {
        instance: InstanceName,
        source: String,
    },
    Error {
        #[serde(skip_serializing_if = "Option::is_none")]
        instance: Option<InstanceName>,
        message: String,
    },
    Stopped,
}

pub mod core;
pub mod event_handlers;
pub mod input;
pub mod runtime;
pub mod sink;

pub use self::core::{CoreStep, EngineCore};
pub use input::{forward_events, spawn_stdin_reader};
pub use runtime::Runtime;
pub use sink::{ReplySink, StdoutReplySink};
