//! Account Ledger Library
//! # Overview
//!
//! This library provides a minimal account ledger: a set of accounts, each
//! with a credit limit and a running balance, and an append-only log of the
//! transactions applied to them.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Transaction, errors)
//! - [`cli`] - CLI and environment configuration
//! - [`core`] - Business logic components:
//!   - [`core::validator`] - Request shape checks
//!   - [`core::engine`] - Transaction application and statements
//!   - [`core::account_store`] - Account rows and per-row locks
//!   - [`core::transaction_log`] - Append-only transaction records
//!   - [`core::replay`] - Batch submission partitioned by client
//! - [`io`] - CSV seed loading, request reading and snapshot output
//! - [`http`] - HTTP API
//! - [`command`] - `serve` and `replay` runners
//! - [`observability`] - Logging setup and pool monitoring
//!
//! # Transaction Kinds
//!
//! - **Credit**: adds the amount to the balance
//! - **Debit**: subtracts the amount, rejected if the balance would drop
//!   below `-limit`
//!
//! # Consistency
//!
//! Units of work on one account are serialized by its row lock and are
//! atomic: a transaction either updates the balance and appends its record,
//! or does neither. Different accounts never wait on each other.

// Module declarations
pub mod cli;
pub mod command;
pub mod core;
pub mod http;
pub mod io;
pub mod observability;
pub mod types;

pub use core::{AccountStore, EngineConfig, LedgerEngine, STATEMENT_SIZE};
pub use io::{load_accounts, write_accounts_csv};
pub use types::{
    Account, AccountSnapshot, ClientId, LedgerError, Statement, Transaction, TransactionKind,
    TransactionRecord, TransactionRequest,
};
