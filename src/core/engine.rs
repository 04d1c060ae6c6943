//! Ledger engine: balance mutation and statement reads
//!
//! This module provides the `LedgerEngine`, the sole writer of account
//! balances and the sole appender of transaction records.
//!
//! # Architecture
//!
//! ```text
//! LedgerEngine
//!     ├── Arc<AccountStore>    (accounts keyspace, per-row locks)
//!     ├── Arc<TransactionLog>  (append-only transactions keyspace)
//!     └── Arc<ConnectionPool>  (bounded, process-wide)
//! ```
//!
//! # Thread Safety
//!
//! The engine is cheap to clone and every clone shares the same state.
//! Units of work on the same account are serialized by the row lock; units
//! of work on different accounts never wait on each other.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::account_store::AccountStore;
use super::pool::ConnectionPool;
use super::transaction_log::TransactionLog;
use super::unit_of_work::UnitOfWork;
use super::validator::{validate_request, ValidationPolicy};
use crate::types::{
    Account, AccountSnapshot, ClientId, LedgerError, Reconciliation, Statement, Transaction,
    TransactionRequest, TransientFailure,
};

/// Maximum number of transactions returned in a statement
pub const STATEMENT_SIZE: usize = 10;

/// Engine tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Capacity of the connection pool
    pub pool_size: usize,
    /// How long to wait for a pooled connection
    pub pool_timeout: Duration,
    /// How long to wait for an account's row lock
    pub lock_timeout: Duration,
    /// What the validator accepts
    pub policy: ValidationPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pool_size: 50,
            pool_timeout: Duration::from_secs(5),
            lock_timeout: Duration::from_secs(5),
            policy: ValidationPolicy::default(),
        }
    }
}

/// Transaction-applying ledger engine
#[derive(Debug, Clone)]
pub struct LedgerEngine {
    accounts: Arc<AccountStore>,
    log: Arc<TransactionLog>,
    pool: Arc<ConnectionPool>,
    lock_timeout: Duration,
    policy: ValidationPolicy,
}

impl LedgerEngine {
    /// Create an engine over provisioned accounts
    ///
    /// The transaction log starts empty and the pool is sized from `config`.
    pub fn new(accounts: Arc<AccountStore>, config: EngineConfig) -> Self {
        Self {
            accounts,
            log: Arc::new(TransactionLog::new()),
            pool: Arc::new(ConnectionPool::new(config.pool_size, config.pool_timeout)),
            lock_timeout: config.lock_timeout,
            policy: config.policy,
        }
    }

    pub fn accounts(&self) -> &Arc<AccountStore> {
        &self.accounts
    }

    pub fn log(&self) -> &Arc<TransactionLog> {
        &self.log
    }

    pub fn pool(&self) -> &Arc<ConnectionPool> {
        &self.pool
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// Validate a raw request and apply it
    ///
    /// Validation failures are returned before any storage access.
    pub async fn submit(
        &self,
        request: &TransactionRequest,
        cancel: &CancellationToken,
    ) -> Result<AccountSnapshot, LedgerError> {
        let tx = validate_request(request, self.policy).map_err(|e| {
            debug!(client = request.client, error = %e, "transaction request rejected");
            LedgerError::from(e)
        })?;
        self.apply_transaction(&tx, cancel).await
    }

    /// Apply a validated transaction to its account
    ///
    /// Runs one unit of work: lock the account row, compute the candidate
    /// balance, and either commit the new balance together with the log
    /// record or abort with no effect.
    ///
    /// # Returns
    ///
    /// * `Ok(AccountSnapshot)` - state as committed by this unit of work
    /// * `Err(LedgerError::AccountNotFound)` - no such account; nothing was locked
    /// * `Err(LedgerError::LimitExceeded)` - `balance + delta + limit < 0`
    /// * `Err(LedgerError::Overflow)` - new balance does not fit
    /// * `Err(LedgerError::Transient)` - lock/pool timeout, closed pool, or `cancel` fired
    pub async fn apply_transaction(
        &self,
        tx: &Transaction,
        cancel: &CancellationToken,
    ) -> Result<AccountSnapshot, LedgerError> {
        let result = self.run_unit_of_work(tx, cancel).await;

        match &result {
            Ok(snapshot) => debug!(
                client = tx.client(),
                kind = %tx.kind(),
                amount = tx.amount(),
                balance = snapshot.balance,
                "transaction accepted"
            ),
            Err(e) if e.is_retryable() => warn!(
                client = tx.client(),
                kind = %tx.kind(),
                amount = tx.amount(),
                error = %e,
                "transaction aborted"
            ),
            Err(e) => debug!(
                client = tx.client(),
                kind = %tx.kind(),
                amount = tx.amount(),
                error = %e,
                "transaction rejected"
            ),
        }

        result
    }

    async fn run_unit_of_work(
        &self,
        tx: &Transaction,
        cancel: &CancellationToken,
    ) -> Result<AccountSnapshot, LedgerError> {
        let client = tx.client();
        let row = self
            .accounts
            .row(client)
            .ok_or_else(|| LedgerError::account_not_found(client))?;

        let work = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(LedgerError::transient(client, TransientFailure::Cancelled));
            }
            begun = UnitOfWork::begin(row, &self.pool, self.lock_timeout) => {
                begun.map_err(|reason| LedgerError::transient(client, reason))?
            }
        };

        let account = work.account();
        let delta = tx.signed_delta();
        let candidate = account
            .balance
            .checked_add(delta)
            .ok_or_else(|| LedgerError::overflow(client, delta))?;

        if !account.admits(candidate) {
            return Err(LedgerError::limit_exceeded(
                client,
                account.balance,
                account.limit,
                delta,
            ));
        }

        if cancel.is_cancelled() {
            return Err(LedgerError::transient(client, TransientFailure::Cancelled));
        }

        Ok(work.commit(tx, candidate, &self.log).await)
    }

    /// Current balance plus up to [`STATEMENT_SIZE`] most recent transactions
    ///
    /// Reads committed state only and never waits on a unit of work in
    /// progress. A transaction that commits during the read may or may not be
    /// reflected, but the balance and the entries always agree.
    pub async fn get_statement(
        &self,
        client: ClientId,
        cancel: &CancellationToken,
    ) -> Result<Statement, LedgerError> {
        let row = self
            .accounts
            .row(client)
            .ok_or_else(|| LedgerError::account_not_found(client))?;

        let _connection = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(LedgerError::transient(client, TransientFailure::Cancelled));
            }
            connection = self.pool.acquire() => {
                connection.map_err(|reason| LedgerError::transient(client, reason))?
            }
        };

        // Commits append and set the balance under the write guard.
        let state = row.state().read().await;
        let transactions = self.log.recent(client, STATEMENT_SIZE);

        Ok(Statement {
            account: state.snapshot(),
            transactions,
        })
    }

    /// Compare an account's running balance with the sum of its log
    ///
    /// Takes the row lock so no commit is in flight while the two are read.
    pub async fn reconcile(&self, client: ClientId) -> Result<Reconciliation, LedgerError> {
        let row = self
            .accounts
            .row(client)
            .ok_or_else(|| LedgerError::account_not_found(client))?;
        let work = UnitOfWork::begin(row, &self.pool, self.lock_timeout)
            .await
            .map_err(|reason| LedgerError::transient(client, reason))?;

        let account = work.account();
        Ok(Reconciliation {
            client,
            limit: account.limit,
            balance: account.balance,
            opening_balance: account.opening_balance,
            log_sum: self.log.sum_deltas(client),
            entries: self.log.count(client),
        })
    }

    /// Committed state of every account, sorted by client id
    pub async fn all_accounts(&self) -> Vec<Account> {
        self.accounts.all_accounts().await
    }
}
