//! Account storage with per-row exclusive locks
//!
//! This module provides the `AccountStore`, the `accounts` keyspace of the
//! ledger. Rows are provisioned out of band and never created by the engine.
//!
//! # Design
//!
//! The store uses `DashMap` (a concurrent HashMap) keyed by client id. Each
//! entry is an `Arc<AccountRow>` holding two locks:
//!
//! - `write_lock`: serializes units of work on this account. It is held from
//!   the balance read to the commit, so read-modify-write is atomic per
//!   account while other accounts proceed in parallel.
//! - `state`: the committed account. Writers take it only for the instant of
//!   the commit, so statement reads never wait on an in-flight unit of work.
//!
//! The DashMap shard lock is only held long enough to clone the `Arc`, never
//! across an await point.

use crate::types::{Account, ClientId, ProvisionError};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// One account row and its locks
#[derive(Debug)]
pub struct AccountRow {
    client: ClientId,
    write_lock: Arc<Mutex<()>>,
    state: RwLock<Account>,
}

impl AccountRow {
    fn new(account: Account) -> Self {
        Self {
            client: account.client,
            write_lock: Arc::new(Mutex::new(())),
            state: RwLock::new(account),
        }
    }

    pub fn client(&self) -> ClientId {
        self.client
    }

    /// Read the last committed state of the account
    pub async fn committed(&self) -> Account {
        self.state.read().await.clone()
    }

    /// Wait for exclusive write access to this row
    pub(crate) async fn lock_exclusive(&self) -> OwnedMutexGuard<()> {
        Arc::clone(&self.write_lock).lock_owned().await
    }

    /// Committed state, for the commit step of a unit of work
    pub(crate) fn state(&self) -> &RwLock<Account> {
        &self.state
    }
}

/// Thread-safe account store
///
/// All methods are safe to call from multiple threads concurrently.
#[derive(Debug, Default)]
pub struct AccountStore {
    rows: DashMap<ClientId, Arc<AccountRow>>,
}

impl AccountStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
        }
    }

    /// Seed an account into the store
    ///
    /// This is the out-of-band provisioning path; the ledger engine never
    /// calls it.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the account was added
    /// * `Err(ProvisionError::NegativeLimit)` if `limit < 0`
    /// * `Err(ProvisionError::BelowLimit)` if `balance + limit < 0`
    /// * `Err(ProvisionError::DuplicateAccount)` if the id is already present
    pub fn provision(&self, account: Account) -> Result<(), ProvisionError> {
        if account.limit < 0 {
            return Err(ProvisionError::NegativeLimit {
                client: account.client,
                limit: account.limit,
            });
        }
        if !account.admits(account.balance) {
            return Err(ProvisionError::BelowLimit {
                client: account.client,
                balance: account.balance,
                limit: account.limit,
            });
        }

        match self.rows.entry(account.client) {
            Entry::Occupied(_) => Err(ProvisionError::DuplicateAccount {
                client: account.client,
            }),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(AccountRow::new(account)));
                Ok(())
            }
        }
    }

    /// Look up the row for a client
    pub fn row(&self, client: ClientId) -> Option<Arc<AccountRow>> {
        self.rows.get(&client).map(|row| Arc::clone(row.value()))
    }

    pub fn contains(&self, client: ClientId) -> bool {
        self.rows.contains_key(&client)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All provisioned client ids, ascending
    pub fn client_ids(&self) -> Vec<ClientId> {
        let mut ids: Vec<ClientId> = self.rows.iter().map(|row| *row.key()).collect();
        ids.sort_unstable();
        ids
    }

    /// Committed state of every account, sorted by client id
    ///
    /// Each row is read independently; the result is not a consistent cut
    /// across accounts while writers are active.
    pub async fn all_accounts(&self) -> Vec<Account> {
        let mut rows: Vec<Arc<AccountRow>> =
            self.rows.iter().map(|row| Arc::clone(row.value())).collect();
        rows.sort_unstable_by_key(|row| row.client());

        let mut accounts = Vec::with_capacity(rows.len());
        for row in rows {
            accounts.push(row.committed().await);
        }
        accounts
    }
}
