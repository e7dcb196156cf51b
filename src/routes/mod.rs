//! HTTP route handlers.
//!
//! Both routes are stateless liveness probes and are served with
//! `Cache-Control: no-store` so no upstream cache answers for the process.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod health;
pub mod ping;

use axum::{middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_LIVENESS;
use crate::middleware::request_id_layer;

/// Creates the Axum router with the liveness routes.
pub fn create_router() -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/ping", get(ping::ping))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_LIVENESS),
        ))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
