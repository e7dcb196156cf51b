//! HTTP server module.
//!
//! Binds a single plain-HTTP listener and serves the router on it until the
//! process exits. A bind failure is returned to the caller and is fatal.

mod server;

pub use server::{bind, serve, start_server, ServerError};
