//! Core business logic module
//!
//! This module contains the ledger components:
//! - `validator` - Shape checks on raw transaction requests
//! - `pool` - Process-wide bounded connection pool
//! - `account_store` - Account rows and their per-row locks
//! - `transaction_log` - Append-only record of accepted transactions
//! - `unit_of_work` - Lock, read, commit or roll back one account
//! - `engine` - Transaction application and statement reads
//! - `replay` - Batch submission partitioned by client

pub mod account_store;
pub mod engine;
pub mod pool;
pub mod replay;
pub mod transaction_log;
mod unit_of_work;
pub mod validator;

pub use account_store::{AccountRow, AccountStore};
pub use engine::{EngineConfig, LedgerEngine, STATEMENT_SIZE};
pub use pool::{ConnectionPool, PoolStats, PooledConnection};
pub use replay::{BatchProcessor, ProcessingResult, ReplayConfig, ReplaySummary};
pub use transaction_log::TransactionLog;
pub use validator::{validate, validate_request, ValidationPolicy};
