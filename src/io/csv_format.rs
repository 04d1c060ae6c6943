//! CSV format handling for account seed rows and snapshot output
//!
//! This module centralizes the account CSV layout, `client,limit,balance`,
//! shared by the seed file and the replay output.
//!
//! All functions are pure (no file access) for easy testing.

use crate::types::{Account, ClientId, LoadError};
use serde::Deserialize;
use std::io::Write;

/// One row of the account seed file
///
/// `balance` may be omitted and then defaults to zero.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AccountSeedRecord {
    pub client: ClientId,
    pub limit: i64,
    #[serde(default)]
    pub balance: i64,
}

impl From<AccountSeedRecord> for Account {
    fn from(record: AccountSeedRecord) -> Self {
        Account::new(record.client, record.limit, record.balance)
    }
}

/// Write account states as `client,limit,balance`
///
/// Accounts are sorted by client id for deterministic output.
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), LoadError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["client", "limit", "balance"])?;

    let mut sorted_accounts: Vec<&Account> = accounts.iter().collect();
    sorted_accounts.sort_by_key(|account| account.client);

    for account in sorted_accounts {
        writer.write_record(&[
            account.client.to_string(),
            account.limit.to_string(),
            account.balance.to_string(),
        ])?;
    }

    writer.flush()?;

    Ok(())
}
