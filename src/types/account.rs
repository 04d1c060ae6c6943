//! Account-related types for the account ledger
//!
//! This module defines the stored account row, the snapshot returned to
//! callers after a mutation, and the statement view.

use super::transaction::{ClientId, TransactionRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Client account state
///
/// Only `balance` and `updated_at` ever change after provisioning, and only
/// the ledger engine changes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// The client ID
    pub client: ClientId,

    /// How far below zero the balance may go
    ///
    /// Never negative. The account may carry a balance as low as `-limit`.
    pub limit: i64,

    /// Running balance
    ///
    /// Invariant: `balance + limit >= 0`, and
    /// `balance == opening_balance + sum(signed deltas of the log)`.
    pub balance: i64,

    /// Balance the account was provisioned with
    pub opening_balance: i64,

    /// Instant of the last accepted mutation (provisioning time before any)
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create an account as provisioned out of band
    ///
    /// # Arguments
    ///
    /// * `client` - The client ID for this account
    /// * `limit` - Maximum amount the balance may go below zero
    /// * `balance` - Opening balance
    pub fn new(client: ClientId, limit: i64, balance: i64) -> Self {
        Account {
            client,
            limit,
            balance,
            opening_balance: balance,
            updated_at: Utc::now(),
        }
    }

    /// Whether `balance` would respect the limit invariant for this account
    pub fn admits(&self, balance: i64) -> bool {
        i128::from(balance) + i128::from(self.limit) >= 0
    }

    /// Snapshot of the caller-visible state
    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            limit: self.limit,
            balance: self.balance,
            updated_at: self.updated_at,
        }
    }
}

/// Caller-visible view of an account at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccountSnapshot {
    pub limit: i64,
    pub balance: i64,
    pub updated_at: DateTime<Utc>,
}

/// Read-only view of an account plus its most recent transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    pub account: AccountSnapshot,

    /// At most [`crate::core::STATEMENT_SIZE`] records, newest first
    pub transactions: Vec<TransactionRecord>,
}

/// Result of comparing an account's running balance with its log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    pub client: ClientId,
    pub limit: i64,
    pub balance: i64,
    pub opening_balance: i64,
    /// Sum of signed deltas of every record in the log
    pub log_sum: i128,
    pub entries: usize,
}

impl Reconciliation {
    /// Balance equals opening balance plus the log, and the limit holds
    pub fn is_consistent(&self) -> bool {
        i128::from(self.balance) == i128::from(self.opening_balance) + self.log_sum
            && i128::from(self.balance) + i128::from(self.limit) >= 0
    }
}
