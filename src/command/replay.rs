//! Replay command: apply a request file and print final balances
//!
//! # Architecture
//!
//! ```text
//! ReplayRunner
//!     ├── ReplayConfig (batch_size, workers)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BatchProcessor (client partitioning + tasks)
//!     └── LedgerEngine (shared by every task)
//! ```
//!
//! Batches are applied one after the other so a client whose requests span
//! several batches still sees them in file order. Within a batch, clients
//! run in parallel on the multi-threaded runtime.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::core::{
    AccountStore, BatchProcessor, EngineConfig, LedgerEngine, ReplayConfig, ReplaySummary,
};
use crate::io::{load_accounts, write_accounts_csv, AsyncReader};
use crate::types::{LoadError, RunError};

#[derive(Debug, Clone)]
pub struct ReplayRunner {
    engine: EngineConfig,
    config: ReplayConfig,
}

impl ReplayRunner {
    pub fn new(engine: EngineConfig, config: ReplayConfig) -> Self {
        Self { engine, config }
    }

    /// Load accounts, replay `input_path`, and write final balances
    ///
    /// Builds its own multi-threaded runtime with `workers` threads.
    pub fn run(
        &self,
        accounts_path: &Path,
        input_path: &Path,
        output: &mut dyn Write,
    ) -> Result<ReplaySummary, RunError> {
        let store = Arc::new(load_accounts(accounts_path)?);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.workers)
            .enable_all()
            .build()
            .map_err(RunError::Runtime)?;

        runtime.block_on(self.replay(store, input_path, output))
    }

    /// Replay `input_path` against already provisioned accounts
    ///
    /// Ctrl-C cancels every unit of work still in flight; those requests are
    /// counted as cancelled and the output reflects only what committed.
    /// Fails with [`RunError::Unreconciled`] if any account's balance no
    /// longer matches its opening balance plus its log.
    pub async fn replay(
        &self,
        store: Arc<AccountStore>,
        input_path: &Path,
        output: &mut dyn Write,
    ) -> Result<ReplaySummary, RunError> {
        let engine = LedgerEngine::new(store, self.engine);
        let cancel = CancellationToken::new();

        let interrupt = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("interrupt received, cancelling replay");
                    cancel.cancel();
                }
            })
        };

        let applied = self.apply_file(&engine, cancel, input_path).await;
        interrupt.abort();
        let summary = applied?;

        let mut unreconciled = Vec::new();
        for client in engine.accounts().client_ids() {
            match engine.reconcile(client).await {
                Ok(reconciliation) if reconciliation.is_consistent() => {}
                Ok(reconciliation) => {
                    warn!(?reconciliation, "account does not reconcile");
                    unreconciled.push(client);
                }
                Err(e) => {
                    warn!(client, error = %e, "account could not be reconciled");
                    unreconciled.push(client);
                }
            }
        }

        write_accounts_csv(&engine.all_accounts().await, output)?;
        engine.pool().close();

        info!(
            accepted = summary.accepted,
            rejected = summary.total_rejected(),
            malformed = summary.malformed,
            rejected_by_code = ?summary.rejected,
            "replay finished"
        );

        if unreconciled.is_empty() {
            Ok(summary)
        } else {
            Err(RunError::Unreconciled {
                clients: unreconciled,
            })
        }
    }

    async fn apply_file(
        &self,
        engine: &LedgerEngine,
        cancel: CancellationToken,
        input_path: &Path,
    ) -> Result<ReplaySummary, LoadError> {
        let file = tokio::fs::File::open(input_path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => LoadError::FileNotFound {
                    path: input_path.display().to_string(),
                },
                _ => LoadError::from(e),
            })?;

        // csv-async reads futures' AsyncRead
        let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
        let mut reader = AsyncReader::new(compat_file);
        let processor = BatchProcessor::new(engine.clone(), cancel);
        let mut summary = ReplaySummary::default();

        loop {
            let batch = reader.read_batch(self.config.batch_size).await;
            if batch.is_empty() {
                break;
            }

            for outcome in processor.process_batch(batch).await {
                summary.record(&outcome);
            }
        }

        summary.malformed = reader.malformed();
        Ok(summary)
    }
}
