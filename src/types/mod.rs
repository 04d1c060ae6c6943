//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account rows, snapshots and statements
//! - `transaction`: Transaction requests, validated transactions and log records
//! - `error`: Error types for the ledger

pub mod account;
pub mod error;
pub mod transaction;

pub use account::{Account, AccountSnapshot, Reconciliation, Statement};
pub use error::{
    LedgerError, LoadError, ProvisionError, RunError, TransientFailure, ValidationError,
};
pub use transaction::{
    ClientId, SequenceNumber, Transaction, TransactionKind, TransactionRecord, TransactionRequest,
};
