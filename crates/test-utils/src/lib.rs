//! Helpers shared by livebridge's integration tests: fakes for the
//! notification transport and reply channel, config/build builders, and
//! test-scoped logging.

pub mod builders;
pub mod fake_server;
pub mod recording_sink;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

pub use builders::{BuildOutputBuilder, ConfigFileBuilder, EngineConfigBuilder};
pub use fake_server::{FakeServer, FakeServerFactory};
pub use recording_sink::RecordingSink;

/// Upper bound for any single awaited step in a test.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

static TRACING: Once = Once::new();

/// Route `tracing` output into the test harness.
///
/// Output is captured per test and shown only when the test fails (or with
/// `--nocapture`). `RUST_LOG` overrides the default `livebridge=debug`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,livebridge=debug"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Await `fut`, failing the test if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(fut: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_TIMEOUT, fut).await {
        Ok(value) => value,
        Err(_) => panic!("step did not finish within {TEST_TIMEOUT:?}"),
    }
}
