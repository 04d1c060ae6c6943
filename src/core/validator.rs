//! Transaction validation
//!
//! Pure conversion from a raw request into a [`Transaction`]. No I/O, no
//! shared state: the same inputs always produce the same result.

use crate::types::{ClientId, Transaction, TransactionKind, TransactionRequest, ValidationError};

/// Maximum description length, counted in characters
pub const MAX_DESCRIPTION_CHARS: usize = 10;

/// Knobs that change what the validator accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Accept transactions whose amount is zero
    ///
    /// Enabled by default: zero-amount transactions are accepted and logged
    /// without special-casing.
    pub allow_zero_amount: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            allow_zero_amount: true,
        }
    }
}

impl ValidationPolicy {
    /// Policy that refuses zero-amount transactions
    pub fn strict() -> Self {
        Self {
            allow_zero_amount: false,
        }
    }
}

/// Validate raw transaction fields
///
/// Checks run in a fixed order: kind, description, amount.
///
/// # Returns
///
/// * `Ok(Transaction)` - a well-formed transaction
/// * `Err(ValidationError::InvalidKind)` - kind is not exactly `credit` or `debit`
/// * `Err(ValidationError::InvalidDescription)` - description is empty or over 10 characters
/// * `Err(ValidationError::InvalidAmount)` - amount is negative, or zero under a strict policy
pub fn validate(
    client: ClientId,
    amount: i64,
    kind: &str,
    description: &str,
    policy: ValidationPolicy,
) -> Result<Transaction, ValidationError> {
    let kind: TransactionKind = kind
        .parse()
        .map_err(|_| ValidationError::InvalidKind {
            kind: kind.to_string(),
        })?;

    let length = description.chars().count();
    if length == 0 || length > MAX_DESCRIPTION_CHARS {
        return Err(ValidationError::InvalidDescription { length });
    }

    let magnitude = u64::try_from(amount).map_err(|_| ValidationError::InvalidAmount {
        amount,
        reason: "amount must not be negative",
    })?;
    if magnitude == 0 && !policy.allow_zero_amount {
        return Err(ValidationError::InvalidAmount {
            amount,
            reason: "zero-amount transactions are rejected",
        });
    }

    Ok(Transaction::from_validated(
        client,
        magnitude,
        kind,
        description.to_string(),
    ))
}

/// Validate a [`TransactionRequest`]
pub fn validate_request(
    request: &TransactionRequest,
    policy: ValidationPolicy,
) -> Result<Transaction, ValidationError> {
    validate(
        request.client,
        request.amount,
        &request.kind,
        &request.description,
        policy,
    )
}
