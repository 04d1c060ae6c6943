use crate::core::{EngineConfig, ReplayConfig, ValidationPolicy};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Account ledger with per-account serialized transactions
#[derive(Parser, Debug)]
#[command(name = "account-ledger")]
#[command(about = "Account ledger with per-account serialized transactions", long_about = None)]
pub struct CliArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// What to run
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the HTTP API
    Serve(ServeArgs),
    /// Apply a CSV of transaction requests and print final balances
    Replay(ReplayArgs),
}

/// Options shared by every command
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Account seed file
    #[arg(
        long = "accounts",
        value_name = "CSV",
        env = "LEDGER_ACCOUNTS",
        default_value = "accounts.csv",
        global = true,
        help = "Path to the account seed CSV (client,limit,balance)"
    )]
    pub accounts: PathBuf,

    /// Connection pool capacity
    #[arg(
        long = "pool-size",
        value_name = "COUNT",
        env = "DB_MAX_CONN",
        default_value_t = 50,
        global = true,
        help = "Maximum number of concurrent units of work and statement reads"
    )]
    pub pool_size: usize,

    #[arg(
        long = "lock-timeout-ms",
        value_name = "MS",
        env = "LEDGER_LOCK_TIMEOUT_MS",
        default_value_t = 5000,
        global = true,
        help = "How long a unit of work waits for its account row lock"
    )]
    pub lock_timeout_ms: u64,

    #[arg(
        long = "pool-timeout-ms",
        value_name = "MS",
        env = "LEDGER_POOL_TIMEOUT_MS",
        default_value_t = 5000,
        global = true,
        help = "How long to wait for a pooled connection"
    )]
    pub pool_timeout_ms: u64,

    #[arg(
        long = "reject-zero-amount",
        env = "LEDGER_REJECT_ZERO_AMOUNT",
        global = true,
        help = "Reject transactions whose amount is zero"
    )]
    pub reject_zero_amount: bool,

    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        env = "LOG_LEVEL",
        default_value = "info",
        global = true,
        help = "Log level or filter directive (RUST_LOG takes precedence)"
    )]
    pub log_level: String,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(
        long = "bind",
        value_name = "ADDR",
        env = "LEDGER_BIND",
        default_value = "0.0.0.0:8080",
        help = "Address to listen on"
    )]
    pub bind: String,

    #[arg(
        long = "request-timeout-ms",
        value_name = "MS",
        env = "LEDGER_REQUEST_TIMEOUT_MS",
        default_value_t = 30000,
        help = "Deadline after which a request's unit of work is cancelled"
    )]
    pub request_timeout_ms: u64,

    #[arg(
        long = "monitor-pool",
        value_name = "BOOL",
        env = "MONITOR_CONN_POOL",
        default_value = "true",
        value_parser = BoolishValueParser::new(),
        action = ArgAction::Set,
        help = "Log connection pool usage every 10 seconds"
    )]
    pub monitor_pool: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Transaction request CSV (client,amount,kind,description)
    #[arg(value_name = "INPUT", help = "Path to the transaction request CSV")]
    pub input_file: PathBuf,

    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of requests per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    #[arg(
        long = "workers",
        value_name = "COUNT",
        help = "Number of runtime worker threads (default: CPU cores)"
    )]
    pub workers: Option<usize>,
}

impl EngineArgs {
    pub fn to_engine_config(&self) -> EngineConfig {
        let policy = if self.reject_zero_amount {
            ValidationPolicy::strict()
        } else {
            ValidationPolicy::default()
        };

        EngineConfig {
            pool_size: self.pool_size,
            pool_timeout: Duration::from_millis(self.pool_timeout_ms),
            lock_timeout: Duration::from_millis(self.lock_timeout_ms),
            policy,
        }
    }
}

impl ServeArgs {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl ReplayArgs {
    /// Create a ReplayConfig from CLI arguments
    ///
    /// Missing values use the defaults; zero values are replaced with the
    /// defaults and a warning is logged.
    pub fn to_replay_config(&self) -> ReplayConfig {
        if self.batch_size.is_some() || self.workers.is_some() {
            let default = ReplayConfig::default();
            ReplayConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.workers.unwrap_or(default.workers),
            )
        } else {
            ReplayConfig::default()
        }
    }
}
