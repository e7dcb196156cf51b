//! keepwarm: a minimal HTTP liveness service.
//!
//! This is the application entry point. It initializes tracing, resolves
//! configuration from an optional TOML file and the environment, arms the
//! self-ping job, sets up the Axum router and starts the HTTP server.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use keepwarm::config::{AppConfig, LoggingConfig, DEFAULT_LOG_FILTER};
use keepwarm::http::start_server;
use keepwarm::{create_router, SelfPinger};

/// keepwarm: A liveness service that pings itself to stay awake
#[derive(Parser, Debug)]
#[command(name = "keepwarm", version, about)]
struct Args {
    /// Path to an optional configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level filter (e.g., "keepwarm=debug,reqwest=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Resolved before tracing so the log format is known
    let config = AppConfig::load(args.config.as_deref())?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, &config.logging);

    tracing::info!(
        host = %config.http.host,
        port = config.http.port,
        self_url = %config.self_ping.base_url(&config.http),
        "Loaded configuration"
    );

    // Armed independently of the listener; the first ping fires after a full period
    let _self_ping = SelfPinger::from_config(&config)?.spawn();

    let app = create_router();
    start_server(app, &config.http).await?;

    Ok(())
}

fn init_tracing(filter: &str, logging: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(EnvFilter::new(filter));

    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
