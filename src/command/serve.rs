//! Serve command: run the HTTP API until Ctrl-C

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{error, info};

use crate::core::{EngineConfig, LedgerEngine};
use crate::http;
use crate::io::load_accounts;
use crate::observability::{spawn_pool_monitor, POOL_MONITOR_INTERVAL};
use crate::types::RunError;

#[derive(Debug, Clone)]
pub struct ServeRunner {
    engine: EngineConfig,
    bind: String,
    request_timeout: Duration,
    monitor_pool: bool,
}

impl ServeRunner {
    pub fn new(
        engine: EngineConfig,
        bind: impl Into<String>,
        request_timeout: Duration,
        monitor_pool: bool,
    ) -> Self {
        Self {
            engine,
            bind: bind.into(),
            request_timeout,
            monitor_pool,
        }
    }

    /// Load accounts, bind, and serve until Ctrl-C
    ///
    /// After shutdown the pool is closed, so any request still racing the
    /// shutdown fails with a transient error instead of hanging.
    pub fn run(&self, accounts_path: &Path) -> Result<(), RunError> {
        let store = Arc::new(load_accounts(accounts_path)?);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(RunError::Runtime)?;

        runtime.block_on(async {
            let engine = LedgerEngine::new(store, self.engine);
            let listener = TcpListener::bind(&self.bind)
                .await
                .map_err(|source| RunError::Bind {
                    addr: self.bind.clone(),
                    source,
                })?;

            if let Ok(addr) = listener.local_addr() {
                info!(%addr, pool_size = engine.pool().stats().max, "listening");
            }

            let monitor = self
                .monitor_pool
                .then(|| spawn_pool_monitor(Arc::clone(engine.pool()), POOL_MONITOR_INTERVAL));

            let served = http::serve(
                listener,
                engine.clone(),
                self.request_timeout,
                shutdown_signal(),
            )
            .await;

            engine.pool().close();
            if let Some(monitor) = monitor {
                monitor.abort();
            }
            info!("server stopped");

            served.map_err(RunError::Server)
        })
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => {
            // Without a signal handler the server runs until killed.
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    }
}
