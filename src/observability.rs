//! Tracing/logging initialization and the pool monitor

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::core::ConnectionPool;

/// How often the pool monitor reports
pub const POOL_MONITOR_INTERVAL: Duration = Duration::from_secs(10);

/// Initialize tracing/logging for the process.
///
/// `RUST_LOG` wins over `level` when set. Logs are JSON on stderr so that
/// replay output on stdout stays clean. Safe to call multiple times
/// (subsequent calls are no-ops).
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log pool usage every `interval` until the task is aborted
pub fn spawn_pool_monitor(pool: Arc<ConnectionPool>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if pool.is_closed() {
                break;
            }
            let stats = pool.stats();
            debug!(
                acquired = stats.acquired,
                idle = stats.idle,
                max = stats.max,
                "connection pool status"
            );
        }
    })
}
