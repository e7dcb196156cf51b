//! keepwarm: a minimal HTTP liveness service.
//!
//! Serves `GET /` and `GET /ping`, and runs a background job that pings the
//! service's own `/ping` endpoint every ten minutes so hosting platforms that
//! idle inactive services keep the process running.

pub mod config;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod self_ping;

pub use config::AppConfig;
pub use routes::create_router;
pub use self_ping::SelfPinger;
