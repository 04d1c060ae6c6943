//! HTTP API (axum router + server loop)
//!
//! - `routes.rs`: handlers for the account endpoints and `/ping`
//! - `dto.rs`: request/response DTOs and wire-name mapping
//! - `errors.rs`: ledger error to status/JSON mapping
//! - `timeout.rs`: per-request deadline and cancellation token

use std::future::Future;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tokio::net::TcpListener;

use crate::core::LedgerEngine;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod timeout;

pub use timeout::RequestCancellation;

/// Build the full HTTP router
pub fn router(engine: LedgerEngine, request_timeout: Duration) -> Router {
    Router::new()
        .route("/ping", get(routes::ping))
        .route("/clientes/:id/transacoes", post(routes::create_transaction))
        .route("/clientes/:id/extrato", get(routes::get_statement))
        .layer(Extension(engine))
        .layer(axum::middleware::from_fn_with_state(
            request_timeout,
            timeout::request_timeout,
        ))
}

/// Serve the router on `listener` until `shutdown` resolves
///
/// In-flight requests are allowed to finish after `shutdown` fires.
pub async fn serve<F>(
    listener: TcpListener,
    engine: LedgerEngine,
    request_timeout: Duration,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(engine, request_timeout))
        .with_graceful_shutdown(shutdown)
        .await
}
