//! Shared helpers for taskgraph's integration tests.

pub mod builders;
pub mod scripted_runner;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use taskgraph::logging::LOG_ENV;
use tracing_subscriber::{fmt, EnvFilter};

/// Upper bound for a whole graph run in tests. Runs here are in-process or
/// spawn trivial shell commands, so anything slower is a hang.
pub const RUN_TIMEOUT: Duration = Duration::from_secs(5);

static INIT: Once = Once::new();

/// Install a test-writer tracing subscriber once per test binary.
///
/// The filter comes from `TASKGRAPH_LOG` (same variable as the binary),
/// defaulting to `info`. Output is only shown for failing tests unless the
/// harness runs with `--nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Await `f`, panicking if it takes longer than [`RUN_TIMEOUT`]. Catches a
/// scheduler that stops releasing tasks without draining its queue.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(RUN_TIMEOUT, f)
        .await
        .expect("graph run exceeded RUN_TIMEOUT")
}
