//! Request ID middleware for correlating logs with requests.
//!
//! Every request gets a UUID v4 and runs inside a `request` span carrying the
//! id, method and path. Self-pings show up here like any other client, so the
//! user agent is recorded as well.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use http::header::USER_AGENT;
use tracing::Instrument;
use uuid::Uuid;

/// Request ID stored in request extensions.
#[derive(Clone, Copy, Debug)]
pub struct RequestId(pub Uuid);

/// Middleware that generates a request ID and wraps the request in a span.
///
/// Must be the outermost layer so the span covers every other layer.
pub async fn request_id_layer(mut request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let user_agent = request
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        user_agent = %user_agent,
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty,
    );

    request.extensions_mut().insert(RequestId(request_id));
    let start = Instant::now();

    async move {
        let response = next.run(request).await;
        let status = response.status().as_u16();
        let duration_ms = start.elapsed().as_millis() as u64;

        let span = tracing::Span::current();
        span.record("status", status);
        span.record("duration_ms", duration_ms);
        tracing::info!(status, duration_ms, "Request completed");

        response
    }
    .instrument(span)
    .await
}
