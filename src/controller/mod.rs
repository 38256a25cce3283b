// src/controller/mod.rs

//! Lifecycle controller: one per build-tool instance.
//!
//! The build pipeline drives it through three ordered calls:
//!
//! - [`LifecycleController::on_watch_start`]: acquire (and, for the first
//!   instance on an endpoint, start) the shared notification server.
//! - [`LifecycleController::on_build_done`]: fingerprint the build output,
//!   diff it against the previous successful build and notify clients.
//! - [`LifecycleController::on_build_failed`]: drop the baseline so the
//!   next successful build reports every file.
//!
//! Endpoint failures never escape the controller; it degrades to a mode in
//! which builds are still diffed but nothing is dispatched.

use std::net::SocketAddr;

use serde::Serialize;

pub mod build;
pub mod lifecycle;

pub use build::{Asset, BuildOutput, BuildReport};
pub use lifecycle::LifecycleController;

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No watch-start seen yet.
    Idle,
    /// Acquiring or binding the endpoint.
    Starting,
    /// Builds are being processed (possibly in degraded mode).
    Running,
}

/// Result of a watch-start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum StartOutcome {
    /// This controller ran the endpoint's bind and it succeeded.
    Listening { addr: SocketAddr },
    /// Another controller bound the endpoint and it is listening.
    Shared { addr: Option<SocketAddr> },
    /// No usable endpoint; notifications are disabled.
    Degraded { reason: String },
}

impl StartOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, StartOutcome::Degraded { .. })
    }
}
