//! Append-only transaction log
//!
//! This module provides the `TransactionLog`, the `transactions` keyspace of
//! the ledger. Records are indexed by client so the statement path can fetch
//! the most recent entries without scanning other clients.
//!
//! # Ordering
//!
//! Appends for a client happen while the client's row lock is held, so each
//! per-client vector is in commit order: ascending sequence number and
//! non-decreasing `created_at`. Reading it back-to-front yields newest first
//! with ties broken by insertion order.

use crate::types::{ClientId, SequenceNumber, TransactionRecord};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe append-only transaction log
#[derive(Debug)]
pub struct TransactionLog {
    entries: DashMap<ClientId, Vec<TransactionRecord>>,
    next_seq: AtomicU64,
}

impl TransactionLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            next_seq: AtomicU64::new(1),
        }
    }

    /// Reserve the next sequence number
    pub(crate) fn next_sequence(&self) -> SequenceNumber {
        self.next_seq.fetch_add(1, Ordering::Relaxed)
    }

    /// Append an accepted record
    ///
    /// Callers must hold the row lock of `record.client`.
    pub(crate) fn append(&self, record: TransactionRecord) {
        self.entries.entry(record.client).or_default().push(record);
    }

    /// Up to `limit` most recent records for a client, newest first
    ///
    /// Returns an empty vector for a client with no records.
    pub fn recent(&self, client: ClientId, limit: usize) -> Vec<TransactionRecord> {
        self.entries
            .get(&client)
            .map(|records| records.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    /// Number of records for a client
    pub fn count(&self, client: ClientId) -> usize {
        self.entries
            .get(&client)
            .map(|records| records.len())
            .unwrap_or(0)
    }

    /// Sum of signed deltas of every record for a client
    pub fn sum_deltas(&self, client: ClientId) -> i128 {
        self.entries
            .get(&client)
            .map(|records| {
                records
                    .iter()
                    .map(|record| i128::from(record.signed_delta()))
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Total number of records across all clients
    pub fn len(&self) -> usize {
        self.entries.iter().map(|records| records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TransactionLog {
    fn default() -> Self {
        Self::new()
    }
}
