// src/engine/core.rs

//! Engine core: routes pipeline events to lifecycle controllers.
//!
//! This owns every controller of the process and has no channels and no
//! stdout; the async shell (`engine::runtime::Runtime`) feeds it events and
//! writes out the replies it returns.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::ConfigFile;
use crate::controller::LifecycleController;
use crate::engine::event_handlers::{
    handle_build_done, handle_build_failed, handle_startup, handle_watch_run,
};
use crate::engine::{InstanceName, PipelineEvent, PipelineReply};
use crate::errors::{BridgeError, Result};
use crate::fs::FileSystem;
use crate::server::{EndpointRegistry, ServerFactory};

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    /// The reply owed to the pipeline for this event.
    pub reply: PipelineReply,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

#[derive(Debug)]
pub struct EngineCore {
    controllers: BTreeMap<InstanceName, LifecycleController>,
}

impl EngineCore {
    pub fn new(controllers: BTreeMap<InstanceName, LifecycleController>) -> Self {
        Self { controllers }
    }

    /// Build one controller per configured instance, all sharing `registry`.
    pub fn from_config(
        cfg: &ConfigFile,
        registry: Arc<EndpointRegistry>,
        factory: Arc<dyn ServerFactory>,
        fs: Arc<dyn FileSystem>,
    ) -> Result<Self> {
        let mut controllers = BTreeMap::new();
        for (name, engine_cfg) in cfg.instances() {
            let controller = LifecycleController::new(
                engine_cfg.clone(),
                Arc::clone(&registry),
                Arc::clone(&factory),
                Arc::clone(&fs),
            )?;
            controllers.insert(name.clone(), controller);
        }
        Ok(Self::new(controllers))
    }

    pub fn controller(&self, name: &str) -> Option<&LifecycleController> {
        self.controllers.get(name)
    }

    /// Handle a single event and return the reply for it.
    pub async fn step(&mut self, event: PipelineEvent) -> CoreStep {
        let reply = match event {
            PipelineEvent::WatchRun { instance } => match self.resolve(instance) {
                Ok((name, controller)) => handle_watch_run(name, controller).await,
                Err(err) => error_reply(err),
            },
            PipelineEvent::Done { instance, build } => match self.resolve(instance) {
                Ok((name, controller)) => handle_build_done(name, controller, &build),
                Err(err) => error_reply(err),
            },
            PipelineEvent::Failed { instance } => match self.resolve(instance) {
                Ok((name, controller)) => handle_build_failed(name, controller),
                Err(err) => error_reply(err),
            },
            PipelineEvent::Startup { instance, source } => match self.resolve(instance) {
                Ok((name, controller)) => handle_startup(name, controller, &source),
                Err(err) => error_reply(err),
            },
            PipelineEvent::Malformed { message } => PipelineReply::Error {
                instance: None,
                message,
            },
            PipelineEvent::Shutdown => {
                return CoreStep {
                    reply: PipelineReply::Stopped,
                    keep_running: false,
                };
            }
        };

        CoreStep {
            reply,
            keep_running: true,
        }
    }

    /// Find the controller an event is addressed to.
    ///
    /// Events without an instance go to the only configured instance.
    fn resolve(
        &mut self,
        requested: Option<InstanceName>,
    ) -> Result<(InstanceName, &mut LifecycleController)> {
        match requested {
            Some(name) => match self.controllers.get_mut(&name) {
                Some(controller) => Ok((name, controller)),
                None => Err(BridgeError::UnknownInstance(name)),
            },
            None => {
                if self.controllers.len() != 1 {
                    return Err(BridgeError::UnknownInstance(format!(
                        "event names no instance and {} are configured",
                        self.controllers.len()
                    )));
                }
                self.controllers
                    .iter_mut()
                    .next()
                    .map(|(name, controller)| (name.clone(), controller))
                    .ok_or_else(|| BridgeError::UnknownInstance("<none>".to_string()))
            }
        }
    }
}

fn error_reply(err: BridgeError) -> PipelineReply {
    let instance = match &err {
        BridgeError::UnknownInstance(name) => Some(name.clone()),
        _ => None,
    };
    PipelineReply::Error {
        instance,
        message: err.to_string(),
    }
}
