use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use crate::types::{LedgerError, TransientFailure};

pub fn ledger_error_to_response(err: &LedgerError) -> axum::response::Response {
    json_error(status_for(err), err.code(), err.to_string())
}

pub fn status_for(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::Validation(_)
        | LedgerError::LimitExceeded { .. }
        | LedgerError::Overflow { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        LedgerError::AccountNotFound { .. } => StatusCode::NOT_FOUND,
        LedgerError::Transient {
            reason: TransientFailure::Cancelled,
            ..
        } => StatusCode::REQUEST_TIMEOUT,
        LedgerError::Transient { .. } => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValidationError;
    use rstest::rstest;

    #[rstest]
    #[case::validation(
        LedgerError::from(ValidationError::InvalidKind { kind: "x".to_string() }),
        StatusCode::UNPROCESSABLE_ENTITY
    )]
    #[case::limit(LedgerError::limit_exceeded(1, 0, 0, -1), StatusCode::UNPROCESSABLE_ENTITY)]
    #[case::overflow(LedgerError::overflow(1, 1), StatusCode::UNPROCESSABLE_ENTITY)]
    #[case::not_found(LedgerError::account_not_found(6), StatusCode::NOT_FOUND)]
    #[case::lock_timeout(
        LedgerError::transient(1, TransientFailure::LockTimeout),
        StatusCode::SERVICE_UNAVAILABLE
    )]
    #[case::pool_closed(
        LedgerError::transient(1, TransientFailure::PoolClosed),
        StatusCode::SERVICE_UNAVAILABLE
    )]
    #[case::cancelled(
        LedgerError::transient(1, TransientFailure::Cancelled),
        StatusCode::REQUEST_TIMEOUT
    )]
    fn test_status_mapping(#[case] err: LedgerError, #[case] expected: StatusCode) {
        assert_eq!(status_for(&err), expected);
        assert_eq!(ledger_error_to_response(&err).status(), expected);
    }
}
