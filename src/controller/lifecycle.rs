// src/controller/lifecycle.rs

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::bootstrap;
use crate::config::EngineConfig;
use crate::errors::{BridgeError, Result, ServerError};
use crate::fingerprint::{compute_fingerprint, FingerprintMap, FingerprintStore};
use crate::fs::FileSystem;
use crate::matcher::{build_matcher, NameMatcher};
use crate::server::{EndpointRegistry, ServerFactory, SharedServer};

use super::build::{BuildOutput, BuildReport};
use super::{Phase, StartOutcome};

/// Change-detection and notification engine for one build-tool instance.
pub struct LifecycleController {
    config: EngineConfig,
    registry: Arc<EndpointRegistry>,
    factory: Arc<dyn ServerFactory>,
    fs: Arc<dyn FileSystem>,
    ignore: Option<Box<dyn NameMatcher>>,
    store: FingerprintStore,
    phase: Phase,
    /// Endpoint handle; `None` before watch-start and in degraded mode.
    server: Option<SharedServer>,
}

impl fmt::Debug for LifecycleController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleController")
            .field("endpoint", &self.config.endpoint)
            .field("phase", &self.phase)
            .field("running", &self.is_running())
            .field("fingerprints", &self.store.len())
            .finish_non_exhaustive()
    }
}

impl LifecycleController {
    pub fn new(
        config: EngineConfig,
        registry: Arc<EndpointRegistry>,
        factory: Arc<dyn ServerFactory>,
        fs: Arc<dyn FileSystem>,
    ) -> Result<Self> {
        let ignore = config.ignore.as_ref().map(build_matcher).transpose()?;
        Ok(Self {
            config,
            registry,
            factory,
            fs,
            ignore,
            store: FingerprintStore::new(),
            phase: Phase::Idle,
            server: None,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True when a listening endpoint is available for notifications.
    pub fn is_running(&self) -> bool {
        self.usable_server().is_some()
    }

    /// Fingerprints of the last successful build.
    pub fn fingerprints(&self) -> &FingerprintStore {
        &self.store
    }

    /// Acquire the shared endpoint, binding it if nobody has yet.
    ///
    /// Resolves exactly once per call and never fails: a bind error puts the
    /// controller in degraded mode instead. Pipelines may call this before
    /// every rebuild; only one bind is ever attempted per endpoint, and a
    /// controller joining while that bind is in flight waits for its result.
    pub async fn on_watch_start(&mut self) -> StartOutcome {
        if self.phase == Phase::Idle {
            self.phase = Phase::Starting;
        }

        let endpoint = self.config.endpoint.clone();
        let acquired = self.registry.acquire(
            &endpoint,
            self.factory.as_ref(),
            &self.config.server_options(),
        );
        let server = acquired.server;

        // Set only when this call ran the bind.
        let mut attempt: Option<std::result::Result<(), ServerError>> = None;
        let result = {
            let attempt = &mut attempt;
            let server = &server;
            let port = endpoint.port;
            acquired
                .start
                .get_or_init(move || async move {
                    match server.listen(port).await {
                        Ok(addr) => {
                            *attempt = Some(Ok(()));
                            Ok(addr)
                        }
                        Err(err) => {
                            let message = err.to_string();
                            *attempt = Some(Err(err));
                            Err(message)
                        }
                    }
                })
                .await
                .clone()
        };

        let outcome = match (attempt, result) {
            (Some(Ok(())), Ok(addr)) => {
                if !self.config.quiet {
                    info!(port = addr.port(), "Live Reload listening on port {}", addr.port());
                }
                self.server = Some(server);
                StartOutcome::Listening { addr }
            }
            (Some(Err(err)), _) => {
                error!("Live Reload disabled: {err}");
                if !err.is_addr_in_use() {
                    error!(error = ?err, %endpoint, "notification server failed to start");
                }
                self.server = None;
                StartOutcome::Degraded {
                    reason: err.to_string(),
                }
            }
            (_, Ok(addr)) => {
                debug!(%endpoint, "sharing existing notification server");
                self.server = Some(server);
                StartOutcome::Shared { addr: Some(addr) }
            }
            (_, Err(reason)) => {
                debug!(%endpoint, "notification server never started; staying disabled");
                self.server = None;
                StartOutcome::Degraded { reason }
            }
        };

        self.phase = Phase::Running;
        outcome
    }

    /// Diff a finished build against the previous successful one and notify
    /// clients about the changed files.
    ///
    /// If an output file cannot be read the cycle is aborted, the baseline
    /// is cleared (as for a failed build) and the error is returned.
    pub fn on_build_done(&mut self, build: &BuildOutput) -> Result<BuildReport> {
        if !build.children.is_empty() {
            debug!(build = %build.id, children = ?build.children, "build has child builds");
        }

        let mut next = FingerprintMap::new();
        for (name, asset) in build.assets.iter() {
            if self.is_ignored(name) {
                debug!(file = %name, "ignoring output file");
                continue;
            }
            match compute_fingerprint(self.fs.as_ref(), &asset.exists_at) {
                Ok(fingerprint) => {
                    next.insert(name.clone(), fingerprint);
                }
                Err(source) => {
                    warn!(
                        build = %build.id,
                        file = %name,
                        "could not fingerprint output; discarding baseline"
                    );
                    self.store.clear();
                    return Err(BridgeError::Fingerprint {
                        file: name.clone(),
                        source,
                    });
                }
            }
        }

        let changed = self.store.changed_files(&next);
        self.store.replace(next);

        let notified = match self.usable_server() {
            Some(server) => {
                server.notify_clients(&changed);
                true
            }
            None => {
                debug!(build = %build.id, "notifications disabled; skipping dispatch");
                false
            }
        };

        debug!(build = %build.id, ?changed, notified, "build processed");

        Ok(BuildReport {
            build_id: build.id.clone(),
            changed,
            notified,
        })
    }

    /// Forget the baseline after a failed build.
    pub fn on_build_failed(&mut self) {
        debug!(endpoint = %self.config.endpoint, "build failed; resetting fingerprints");
        self.store.clear();
    }

    /// The bootstrap snippet for this controller's endpoint.
    pub fn bootstrap_snippet(&self) -> String {
        let port = self
            .usable_server()
            .and_then(|server| server.local_addr())
            .map(|addr| addr.port());
        bootstrap::render(&self.config.bootstrap(port))
    }

    /// Output-template hook: prepend the bootstrap snippet to generated
    /// source when script-tag injection is enabled and the endpoint is live.
    pub fn startup_hook(&self, source: &str) -> String {
        let inject = self.config.append_script_tag && self.is_running();
        bootstrap::apply(&self.bootstrap_snippet(), source, inject)
    }

    fn is_ignored(&self, name: &str) -> bool {
        self.ignore.as_ref().is_some_and(|m| m.matches(name))
    }

    fn usable_server(&self) -> Option<&SharedServer> {
        self.server.as_ref().filter(|server| server.is_listening())
    }
}
