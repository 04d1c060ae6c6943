use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::debug;

use super::dto::{StatementResponse, TransactionBody, TransactionResponse};
use super::errors::{json_error, ledger_error_to_response};
use super::timeout::RequestCancellation;
use crate::core::LedgerEngine;
use crate::types::ClientId;

pub async fn ping() -> axum::response::Response {
    (StatusCode::OK, Json(serde_json::json!({ "message": "pong" }))).into_response()
}

pub async fn create_transaction(
    Extension(engine): Extension<LedgerEngine>,
    Extension(RequestCancellation(cancel)): Extension<RequestCancellation>,
    Path(id): Path<String>,
    body: Result<Json<TransactionBody>, JsonRejection>,
) -> axum::response::Response {
    let client = match parse_client_id(&id) {
        Ok(client) => client,
        Err(response) => return response,
    };

    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            debug!(client, error = %rejection, "invalid request body");
            return json_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_body",
                rejection.body_text(),
            );
        }
    };

    match engine.submit(&body.into_request(client), &cancel).await {
        Ok(snapshot) => (StatusCode::OK, Json(TransactionResponse::from(snapshot))).into_response(),
        Err(e) => ledger_error_to_response(&e),
    }
}

pub async fn get_statement(
    Extension(engine): Extension<LedgerEngine>,
    Extension(RequestCancellation(cancel)): Extension<RequestCancellation>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let client = match parse_client_id(&id) {
        Ok(client) => client,
        Err(response) => return response,
    };

    match engine.get_statement(client, &cancel).await {
        Ok(statement) => {
            (StatusCode::OK, Json(StatementResponse::from(statement))).into_response()
        }
        Err(e) => {
            debug!(client, error = %e, "statement unavailable");
            ledger_error_to_response(&e)
        }
    }
}

// Ids that are not numbers can never name an account.
fn parse_client_id(id: &str) -> Result<ClientId, axum::response::Response> {
    id.parse().map_err(|_| {
        debug!(id, "invalid client id");
        json_error(
            StatusCode::NOT_FOUND,
            "account_not_found",
            format!("Account {} not found", id),
        )
    })
}
