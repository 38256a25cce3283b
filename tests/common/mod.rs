#![allow(dead_code)]
#![allow(unused_imports)]

use std::sync::Arc;

use livebridge::config::EngineConfig;
use livebridge::controller::LifecycleController;
use livebridge::fs::mock::MockFileSystem;
use livebridge::server::{EndpointRegistry, ServerFactory};

pub use livebridge_test_utils::{
    init_tracing, with_timeout, BuildOutputBuilder, EngineConfigBuilder, FakeServerFactory,
    RecordingSink,
};

/// One controller over a fresh in-memory filesystem.
pub fn controller_with(
    config: EngineConfig,
    registry: &Arc<EndpointRegistry>,
    factory: Arc<dyn ServerFactory>,
    fs: &MockFileSystem,
) -> LifecycleController {
    LifecycleController::new(config, Arc::clone(registry), factory, Arc::new(fs.clone()))
        .expect("controller config should be valid")
}
