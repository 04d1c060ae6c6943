//! Per-request deadline
//!
//! Every request gets its own [`CancellationToken`], reachable from handlers
//! as the [`RequestCancellation`] extension. When the deadline passes the
//! token is cancelled and the handler is still awaited, so an in-flight unit
//! of work either commits or rolls back before the response goes out.

use std::time::Duration;

use axum::{extract::Request, extract::State, middleware::Next, response::Response};
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct RequestCancellation(pub CancellationToken);

pub async fn request_timeout(
    State(timeout): State<Duration>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = CancellationToken::new();
    req.extensions_mut()
        .insert(RequestCancellation(token.clone()));

    let path = req.uri().path().to_string();
    let handler = next.run(req);
    tokio::pin!(handler);

    tokio::select! {
        response = &mut handler => response,
        _ = tokio::time::sleep(timeout) => {
            debug!(path = %path, timeout_ms = timeout.as_millis() as u64, "request deadline reached");
            token.cancel();
            handler.await
        }
    }
}
