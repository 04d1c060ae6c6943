//! Batch submission with client-based partitioning
//!
//! This module provides the `BatchProcessor`, which pushes many transaction
//! requests through the ledger engine at once while keeping each client's
//! requests in submission order.
//!
//! # Design
//!
//! A batch is partitioned by client id. Each client's sub-batch is applied
//! sequentially on its own tokio task, so different clients proceed in
//! parallel and the row lock of an account is never contended by the
//! replay itself.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     ├── LedgerEngine       (shared, cheap to clone)
//!     └── CancellationToken  (root token, cancels every in-flight unit of work)
//! ```

use std::collections::{BTreeMap, HashMap};

use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use super::engine::LedgerEngine;
use crate::types::{AccountSnapshot, ClientId, LedgerError, TransactionRequest};

/// Configuration for batch replay
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayConfig {
    /// Number of requests per batch
    pub batch_size: usize,
    /// Number of runtime worker threads
    pub workers: usize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            workers: num_cpus::get(),
        }
    }
}

impl ReplayConfig {
    /// Create a ReplayConfig, replacing zero values with defaults
    pub fn new(batch_size: usize, workers: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let workers = if workers == 0 {
            warn!(
                workers,
                default = default.workers,
                "invalid worker count, using default"
            );
            default.workers
        } else {
            workers
        };

        Self {
            batch_size,
            workers,
        }
    }
}

/// Outcome of one submitted request
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    pub request: TransactionRequest,
    pub result: Result<AccountSnapshot, LedgerError>,
}

/// Counts of replay outcomes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub accepted: usize,
    /// Rejections keyed by error code
    pub rejected: BTreeMap<&'static str, usize>,
    /// Input rows that could not be parsed
    pub malformed: usize,
}

impl ReplaySummary {
    pub fn record(&mut self, outcome: &ProcessingResult) {
        match &outcome.result {
            Ok(_) => self.accepted += 1,
            Err(e) => *self.rejected.entry(e.code()).or_default() += 1,
        }
    }

    pub fn total_rejected(&self) -> usize {
        self.rejected.values().sum()
    }
}

/// Batch processor with client-based partitioning
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    engine: LedgerEngine,
    cancel: CancellationToken,
}

impl BatchProcessor {
    /// Create a processor whose units of work observe `cancel`
    pub fn new(engine: LedgerEngine, cancel: CancellationToken) -> Self {
        Self { engine, cancel }
    }

    /// Split a batch into per-client sub-batches
    ///
    /// Each request lands in exactly one sub-batch and keeps its relative
    /// order within its client.
    pub fn partition_by_client(
        &self,
        batch: Vec<TransactionRequest>,
    ) -> HashMap<ClientId, Vec<TransactionRequest>> {
        let mut client_batches: HashMap<ClientId, Vec<TransactionRequest>> = HashMap::new();

        for request in batch {
            client_batches
                .entry(request.client)
                .or_default()
                .push(request);
        }

        client_batches
    }

    /// Apply one client's requests in order
    ///
    /// A rejected request does not stop the ones after it.
    pub async fn process_client_requests(
        &self,
        requests: Vec<TransactionRequest>,
    ) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(requests.len());

        for request in requests {
            let result = self.engine.submit(&request, &self.cancel).await;
            results.push(ProcessingResult { request, result });
        }

        results
    }

    /// Apply a batch, one task per client
    ///
    /// Results are grouped by client; the order between clients is
    /// unspecified.
    pub async fn process_batch(&self, batch: Vec<TransactionRequest>) -> Vec<ProcessingResult> {
        let client_batches = self.partition_by_client(batch);

        let mut tasks = Vec::with_capacity(client_batches.len());
        for (_client, requests) in client_batches {
            let processor = self.clone();
            tasks.push(tokio::spawn(async move {
                processor.process_client_requests(requests).await
            }));
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(client_results) => results.extend(client_results),
                Err(e) => error!(error = %e, "replay task failed"),
            }
        }

        results
    }
}
