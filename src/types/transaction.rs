//! Transaction-related types for the account ledger
//!
//! This module defines the transaction kinds, the raw request shape callers
//! submit, the validated domain transaction, and the immutable record that
//! lands in the transaction log once a transaction is accepted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Client identifier
///
/// Accounts are provisioned out of band and referenced by this id.
pub type ClientId = u32;

/// Sequence number assigned to every accepted transaction at commit time
pub type SequenceNumber = u64;

/// Direction of a balance mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Increases the balance by the transaction amount
    Credit,

    /// Decreases the balance by the transaction amount
    ///
    /// The resulting balance may go below zero, but never below `-limit`.
    Debit,
}

impl TransactionKind {
    /// Canonical name of the kind (`credit` or `debit`)
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "credit",
            TransactionKind::Debit => "debit",
        }
    }

    /// Apply the kind's sign to an unsigned magnitude
    pub fn signed(&self, magnitude: i64) -> i64 {
        match self {
            TransactionKind::Credit => magnitude,
            TransactionKind::Debit => -magnitude,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = ();

    /// Parse a kind name. Matching is exact: `Credit` or `c` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit" => Ok(TransactionKind::Credit),
            "debit" => Ok(TransactionKind::Debit),
            _ => Err(()),
        }
    }
}

/// Raw transaction request as submitted by a caller
///
/// Nothing about this value has been checked yet. It becomes a
/// [`Transaction`] only after passing through the validator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransactionRequest {
    pub client: ClientId,
    pub amount: i64,
    pub kind: String,
    pub description: String,
}

impl TransactionRequest {
    pub fn new(
        client: ClientId,
        amount: i64,
        kind: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            client,
            amount,
            kind: kind.into(),
            description: description.into(),
        }
    }
}

/// A well-formed transaction, ready to be applied by the ledger engine
///
/// Fields are private so the only way to obtain one is through
/// [`crate::core::validator::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    client: ClientId,
    amount: u64,
    kind: TransactionKind,
    description: String,
}

impl Transaction {
    /// Build a transaction from parts that have already been checked.
    ///
    /// `amount` must not exceed `i64::MAX`.
    pub(crate) fn from_validated(
        client: ClientId,
        amount: u64,
        kind: TransactionKind,
        description: String,
    ) -> Self {
        Self {
            client,
            amount,
            kind,
            description,
        }
    }

    pub fn client(&self) -> ClientId {
        self.client
    }

    /// Unsigned magnitude as submitted
    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Signed balance delta: `+amount` for credits, `-amount` for debits
    pub fn signed_delta(&self) -> i64 {
        // The validator bounds amount to the non-negative i64 range.
        let magnitude = i64::try_from(self.amount).unwrap_or(i64::MAX);
        self.kind.signed(magnitude)
    }
}

/// An accepted transaction as stored in the append-only log
///
/// Records are never updated or deleted once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    /// Commit order across the whole ledger
    pub seq: SequenceNumber,
    pub client: ClientId,
    pub amount: u64,
    pub kind: TransactionKind,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Build the log record for a transaction accepted at `created_at`
    pub fn accepted(seq: SequenceNumber, tx: &Transaction, created_at: DateTime<Utc>) -> Self {
        Self {
            seq,
            client: tx.client,
            amount: tx.amount,
            kind: tx.kind,
            description: tx.description.clone(),
            created_at,
        }
    }

    pub fn signed_delta(&self) -> i64 {
        let magnitude = i64::try_from(self.amount).unwrap_or(i64::MAX);
        self.kind.signed(magnitude)
    }
}
