//! Account Ledger CLI
//!
//! # Usage
//!
//! ```bash
//! cargo run -- serve
//! cargo run -- --accounts accounts.csv serve --bind 127.0.0.1:9999
//! cargo run -- replay requests.csv > accounts_out.csv
//! cargo run -- replay --batch-size 2000 --workers 8 requests.csv > accounts_out.csv
//! ```
//!
//! Every option can also be set through its environment variable
//! (`LEDGER_ACCOUNTS`, `DB_MAX_CONN`, `LOG_LEVEL`, `MONITOR_CONN_POOL`, ...).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (bad seed file, bind failure, replay did not reconcile, etc.)

use account_ledger::{cli, command, observability};
use std::process;

fn main() {
    let args = cli::parse_args();
    observability::init(&args.engine.log_level);

    if let Err(e) = command::run(&args) {
        tracing::error!(error = %e, "fatal error");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
