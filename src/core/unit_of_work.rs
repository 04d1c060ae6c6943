//! Atomic unit of work scoped to one account
//!
//! A `UnitOfWork` owns, for its whole lifetime, the exclusive row lock of
//! its account and a pooled connection. Nothing is written until [`commit`];
//! dropping an uncommitted unit of work (error return, cancellation, a
//! dropped future) releases the lock and connection with no effect, which is
//! the rollback path.
//!
//! [`commit`]: UnitOfWork::commit

use super::account_store::AccountRow;
use super::pool::{ConnectionPool, PooledConnection};
use super::transaction_log::TransactionLog;
use crate::types::{Account, AccountSnapshot, Transaction, TransactionRecord, TransientFailure};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OwnedMutexGuard;

#[derive(Debug)]
pub(crate) struct UnitOfWork {
    row: Arc<AccountRow>,
    current: Account,
    // Field order is drop order: the connection goes back before the row
    // lock is released.
    _connection: PooledConnection,
    _lock: OwnedMutexGuard<()>,
}

impl UnitOfWork {
    /// Take the row lock, then check out a connection and read the balance
    ///
    /// A caller waiting on a busy row holds no connection.
    pub(crate) async fn begin(
        row: Arc<AccountRow>,
        pool: &ConnectionPool,
        lock_timeout: Duration,
    ) -> Result<Self, TransientFailure> {
        let lock = tokio::time::timeout(lock_timeout, row.lock_exclusive())
            .await
            .map_err(|_| TransientFailure::LockTimeout)?;
        let connection = pool.acquire().await?;
        let current = row.committed().await;

        Ok(Self {
            row,
            current,
            _connection: connection,
            _lock: lock,
        })
    }

    /// Account state as read under the row lock
    pub(crate) fn account(&self) -> &Account {
        &self.current
    }

    /// Append the record and set the new balance together
    ///
    /// The only await point is taking the state lock, before any write.
    /// Once it is held, the log append and balance update run without
    /// yielding, so a cancelled commit leaves no trace.
    pub(crate) async fn commit(
        self,
        tx: &Transaction,
        new_balance: i64,
        log: &TransactionLog,
    ) -> AccountSnapshot {
        let mut state = self.row.state().write().await;

        let now = Utc::now().max(state.updated_at);
        log.append(TransactionRecord::accepted(log.next_sequence(), tx, now));
        state.balance = new_balance;
        state.updated_at = now;

        state.snapshot()
    }
}
