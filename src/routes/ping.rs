//! Ping status probe.
//!
//! `GET /ping` reports `"ok"` together with the server's current UTC time.
//! This is also the endpoint the self-ping timer targets.

use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Status value reported by every ping
pub const PING_STATUS_OK: &str = "ok";

/// JSON body of a ping response, built fresh on every request.
#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    /// RFC 3339 timestamp in UTC with millisecond precision
    pub time: String,
}

impl PingResponse {
    pub fn now() -> Self {
        Self {
            status: PING_STATUS_OK,
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Ping handler.
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse::now())
}
