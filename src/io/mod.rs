//! I/O module
//!
//! Handles CSV parsing and output.
//!
//! # Components
//!
//! - `csv_format` - Account CSV layout (seed rows, snapshot output)
//! - `account_loader` - Synchronous seed file loading into an account store
//! - `async_reader` - Asynchronous transaction request reader with batch interface

pub mod account_loader;
pub mod async_reader;
pub mod csv_format;

pub use account_loader::{load_accounts, read_accounts};
pub use async_reader::AsyncReader;
pub use csv_format::{write_accounts_csv, AccountSeedRecord};
