//! HTTP server startup logic.

use axum::Router;
use tokio::net::TcpListener;

use crate::config::HttpServerConfig;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind server on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Bind the listener on the configured host and port.
///
/// The host may be an IPv4 or IPv6 literal or a hostname. Every resolved
/// address is tried in turn until one binds.
pub async fn bind(config: &HttpServerConfig) -> Result<TcpListener, ServerError> {
    TcpListener::bind((config.host.as_str(), config.port))
        .await
        .map_err(|source| ServerError::Bind {
            addr: format!("{}:{}", config.host, config.port),
            source,
        })
}

/// Serve the router on an already bound listener.
///
/// This function blocks until the server stops, which in practice is process exit.
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), ServerError> {
    axum::serve(listener, app).await?;
    Ok(())
}

/// Bind, announce readiness and serve.
pub async fn start_server(app: Router, config: &HttpServerConfig) -> Result<(), ServerError> {
    let listener = bind(config).await?;
    let addr = listener.local_addr()?;

    tracing::info!(%addr, "🚀 Server running on port {}", addr.port());

    serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_accepts_hostname() {
        let config = HttpServerConfig {
            host: "localhost".to_string(),
            port: 0,
        };
        let listener = bind(&config).await.unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }

    #[tokio::test]
    async fn test_bind_fails_when_port_in_use() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = HttpServerConfig {
            host: "127.0.0.1".to_string(),
            port: taken.local_addr().unwrap().port(),
        };
        assert!(matches!(bind(&config).await, Err(ServerError::Bind { .. })));
    }
}
