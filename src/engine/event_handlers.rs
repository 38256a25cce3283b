// src/engine/event_handlers.rs

//! Per-event handling for the engine core.
//!
//! Each handler drives one controller and turns the result into the reply
//! the pipeline is waiting for.

use tracing::{info, warn};

use crate::controller::{BuildOutput, LifecycleController};
use crate::engine::{InstanceName, PipelineReply};

/// Watch-start: acquire/bind the endpoint. Always yields `Started`.
pub async fn handle_watch_run(
    name: InstanceName,
    controller: &mut LifecycleController,
) -> PipelineReply {
    let outcome = controller.on_watch_start().await;
    PipelineReply::Started {
        instance: name,
        outcome,
    }
}

/// Build finished: diff and notify.
///
/// A fingerprinting failure is reported as an `Error` reply; the pipeline
/// keeps running.
pub fn handle_build_done(
    name: InstanceName,
    controller: &mut LifecycleController,
    build: &BuildOutput,
) -> PipelineReply {
    match controller.on_build_done(build) {
        Ok(report) => {
            if !report.changed.is_empty() {
                info!(
                    instance = %name,
                    build = %report.build_id,
                    changed = ?report.changed,
                    notified = report.notified,
                    "output changed"
                );
            }
            PipelineReply::Built {
                instance: name,
                report,
            }
        }
        Err(err) => {
            warn!(instance = %name, build = %build.id, error = %err, "build cycle aborted");
            PipelineReply::Error {
                instance: Some(name),
                message: err.to_string(),
            }
        }
    }
}

/// Build failed: reset the fingerprint baseline.
pub fn handle_build_failed(
    name: InstanceName,
    controller: &mut LifecycleController,
) -> PipelineReply {
    controller.on_build_failed();
    PipelineReply::Reset { instance: name }
}

/// Output-template hook.
pub fn handle_startup(
    name: InstanceName,
    controller: &LifecycleController,
    source: &str,
) -> PipelineReply {
    PipelineReply::Startup {
        instance: name,
        source: controller.startup_hook(source),
    }
}
