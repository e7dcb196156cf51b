//! Root liveness endpoint.
//!
//! Returns 200 OK with a fixed body whenever the process can answer HTTP.
//! Used by hosting platforms and load balancers to verify the service is alive.

/// Body returned by `GET /`
pub const LIVENESS_MESSAGE: &str = "✅ Server is alive";

/// Root liveness handler.
pub async fn root() -> &'static str {
    LIVENESS_MESSAGE
}
