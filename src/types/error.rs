//! Error types for the account ledger
//!
//! # Error Categories
//!
//! - **Validation errors**: caller-input faults detected before any I/O
//! - **Business rejections**: limit exceeded, arithmetic overflow
//! - **Not found**: the referenced account does not exist
//! - **Transient failures**: lock or pool timeouts, closed pool, cancellation.
//!   The unit of work is rolled back and the caller may retry.
//! - **Load errors**: account seed and request file problems (CLI only)

use super::transaction::ClientId;
use thiserror::Error;

/// Rejection produced by the transaction validator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Kind was not exactly `credit` or `debit`
    #[error("Invalid transaction kind '{kind}': expected 'credit' or 'debit'")]
    InvalidKind {
        /// The rejected kind string
        kind: String,
    },

    /// Description was empty or longer than 10 characters
    #[error("Invalid description length {length}: must be between 1 and 10 characters")]
    InvalidDescription {
        /// Length in characters, not bytes
        length: usize,
    },

    /// Amount was negative, or zero while zero amounts are rejected
    #[error("Invalid amount {amount}: {reason}")]
    InvalidAmount {
        /// The rejected amount
        amount: i64,
        /// Why it was rejected
        reason: &'static str,
    },
}

/// Infrastructure failure that aborted a unit of work
///
/// These are the only failures a caller should consider retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransientFailure {
    #[error("timed out waiting for the account row lock")]
    LockTimeout,

    #[error("timed out waiting for a pooled connection")]
    PoolTimeout,

    #[error("connection pool is closed")]
    PoolClosed,

    #[error("unit of work was cancelled")]
    Cancelled,
}

/// Outcome of a rejected ledger operation
///
/// Every variant means the ledger state is exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The request never reached storage
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The referenced account has not been provisioned
    #[error("Account {client} not found")]
    AccountNotFound {
        /// Client ID that was looked up
        client: ClientId,
    },

    /// Applying the delta would take the balance below `-limit`
    ///
    /// A definitive business rejection, never retried automatically.
    #[error("Limit exceeded for client {client}: balance {balance}, limit {limit}, delta {delta}")]
    LimitExceeded {
        /// Client ID
        client: ClientId,
        /// Balance at the time of the check
        balance: i64,
        /// The account's limit
        limit: i64,
        /// Signed delta that was refused
        delta: i64,
    },

    /// The new balance does not fit the balance type
    #[error("Arithmetic overflow applying {delta} to client {client}")]
    Overflow {
        /// Client ID
        client: ClientId,
        /// Signed delta that was refused
        delta: i64,
    },

    /// Infrastructure failure; the unit of work was rolled back
    #[error("Transient failure for client {client}: {reason}")]
    Transient {
        /// Client ID
        client: ClientId,
        /// What went wrong
        reason: TransientFailure,
    },
}

impl LedgerError {
    /// Create an AccountNotFound error
    pub fn account_not_found(client: ClientId) -> Self {
        LedgerError::AccountNotFound { client }
    }

    /// Create a LimitExceeded error
    pub fn limit_exceeded(client: ClientId, balance: i64, limit: i64, delta: i64) -> Self {
        LedgerError::LimitExceeded {
            client,
            balance,
            limit,
            delta,
        }
    }

    /// Create an Overflow error
    pub fn overflow(client: ClientId, delta: i64) -> Self {
        LedgerError::Overflow { client, delta }
    }

    /// Create a Transient error
    pub fn transient(client: ClientId, reason: TransientFailure) -> Self {
        LedgerError::Transient { client, reason }
    }

    /// Only infrastructure failures are candidates for caller-driven retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Transient { .. })
    }

    /// Short machine-readable code, stable across messages
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::Validation(ValidationError::InvalidKind { .. }) => "invalid_kind",
            LedgerError::Validation(ValidationError::InvalidDescription { .. }) => {
                "invalid_description"
            }
            LedgerError::Validation(ValidationError::InvalidAmount { .. }) => "invalid_amount",
            LedgerError::AccountNotFound { .. } => "account_not_found",
            LedgerError::LimitExceeded { .. } => "limit_exceeded",
            LedgerError::Overflow { .. } => "overflow",
            LedgerError::Transient {
                reason: TransientFailure::Cancelled,
                ..
            } => "cancelled",
            LedgerError::Transient { .. } => "transient_failure",
        }
    }
}

/// Problem seeding an account into the store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisionError {
    #[error("Account {client} is already provisioned")]
    DuplicateAccount { client: ClientId },

    #[error("Account {client} has negative limit {limit}")]
    NegativeLimit { client: ClientId, limit: i64 },

    #[error("Account {client} opening balance {balance} is below its limit {limit}")]
    BelowLimit {
        client: ClientId,
        balance: i64,
        limit: i64,
    },
}

/// Fatal error while reading seed or request files
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// A seed row could not be provisioned
    #[error(transparent)]
    Provision(#[from] ProvisionError),
}

impl From<std::io::Error> for LoadError {
    fn from(error: std::io::Error) -> Self {
        LoadError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LoadError {
    fn from(error: csv::Error) -> Self {
        if error.is_io_error() {
            return LoadError::Io {
                message: error.to_string(),
            };
        }
        let line = error.position().map(|pos| pos.line());

        LoadError::Parse {
            line,
            message: error.to_string(),
        }
    }
}

/// Fatal error that stops a `serve` or `replay` run
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(#[source] std::io::Error),

    /// Balance and log disagree for these accounts after a replay
    #[error("{} account(s) failed reconciliation: {clients:?}", clients.len())]
    Unreconciled { clients: Vec<ClientId> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::invalid_kind(
        LedgerError::Validation(ValidationError::InvalidKind { kind: "x".to_string() }),
        "Invalid transaction kind 'x': expected 'credit' or 'debit'"
    )]
    #[case::invalid_description(
        LedgerError::Validation(ValidationError::InvalidDescription { length: 11 }),
        "Invalid description length 11: must be between 1 and 10 characters"
    )]
    #[case::account_not_found(
        LedgerError::account_not_found(6),
        "Account 6 not found"
    )]
    #[case::limit_exceeded(
        LedgerError::limit_exceeded(1, 1000, 1000, -2500),
        "Limit exceeded for client 1: balance 1000, limit 1000, delta -2500"
    )]
    #[case::transient(
        LedgerError::transient(2, TransientFailure::LockTimeout),
        "Transient failure for client 2: timed out waiting for the account row lock"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::validation(LedgerError::from(ValidationError::InvalidDescription { length: 0 }), false)]
    #[case::not_found(LedgerError::account_not_found(1), false)]
    #[case::limit(LedgerError::limit_exceeded(1, 0, 0, -1), false)]
    #[case::overflow(LedgerError::overflow(1, i64::MAX), false)]
    #[case::lock_timeout(LedgerError::transient(1, TransientFailure::LockTimeout), true)]
    #[case::cancelled(LedgerError::transient(1, TransientFailure::Cancelled), true)]
    fn test_only_transient_failures_are_retryable(
        #[case] error: LedgerError,
        #[case] retryable: bool,
    ) {
        assert_eq!(error.is_retryable(), retryable);
    }

    #[rstest]
    #[case(LedgerError::limit_exceeded(1, 0, 0, -1), "limit_exceeded")]
    #[case(LedgerError::transient(1, TransientFailure::PoolClosed), "transient_failure")]
    #[case(LedgerError::transient(1, TransientFailure::Cancelled), "cancelled")]
    fn test_error_codes(#[case] error: LedgerError, #[case] code: &str) {
        assert_eq!(error.code(), code);
    }

    #[rstest]
    #[case::parse_error_with_line(
        LoadError::Parse { line: Some(42), message: "Invalid field".to_string() },
        "CSV parse error at line 42: Invalid field"
    )]
    #[case::parse_error_without_line(
        LoadError::Parse { line: None, message: "Invalid field".to_string() },
        "CSV parse error: Invalid field"
    )]
    #[case::provision(
        LoadError::Provision(ProvisionError::DuplicateAccount { client: 3 }),
        "Account 3 is already provisioned"
    )]
    fn test_load_error_display(#[case] error: LoadError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: LoadError = io_error.into();
        assert!(matches!(error, LoadError::Io { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
