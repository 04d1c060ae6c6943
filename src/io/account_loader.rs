//! Account seed loading
//!
//! Reads `client,limit,balance` rows and provisions them into an
//! [`AccountStore`]. This is the only path that creates accounts.
//!
//! # Error Handling
//!
//! Seed data is trusted configuration, so any bad row aborts the load:
//! - a missing file is reported as [`LoadError::FileNotFound`]
//! - a row that does not parse is [`LoadError::Parse`] with its line number
//! - a duplicate id or a balance below its limit is [`LoadError::Provision`]

use crate::core::AccountStore;
use crate::io::csv_format::AccountSeedRecord;
use crate::types::LoadError;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Load a seed file into a new store
pub fn load_accounts(path: &Path) -> Result<AccountStore, LoadError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => LoadError::from(e),
    })?;

    let store = AccountStore::new();
    let provisioned = read_accounts(file, &store)?;
    info!(path = %path.display(), accounts = provisioned, "accounts provisioned");

    Ok(store)
}

/// Provision every seed row from `reader` into `store`
///
/// Returns the number of accounts added.
pub fn read_accounts<R: Read>(reader: R, store: &AccountStore) -> Result<usize, LoadError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .buffer_capacity(8 * 1024)
        .from_reader(reader);

    let mut provisioned = 0;
    for record in reader.deserialize::<AccountSeedRecord>() {
        store.provision(record?.into())?;
        provisioned += 1;
    }

    Ok(provisioned)
}
