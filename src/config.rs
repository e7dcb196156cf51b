//! Configuration loading and constants.
//!
//! Configuration is resolved once at startup from three layers: built-in
//! defaults, an optional TOML file, and the `PORT` / `SELF_URL` environment
//! variables. `AppConfig` is the root configuration struct containing all settings.

use const_format::formatcp;
use reqwest::Url;
use serde::Deserialize;
use std::path::Path;

// =============================================================================
// HTTP Response Cache Control
// =============================================================================

/// Liveness responses must always come from the process itself
pub const CACHE_CONTROL_LIVENESS: &str = "no-store";

// =============================================================================
// Self-Ping Constants
// =============================================================================

/// Period between self-pings in seconds (10 minutes)
pub const SELF_PING_INTERVAL_SECS: u64 = 600;

/// Timeout for a single self-ping request in seconds
pub const SELF_PING_TIMEOUT_SECS: u64 = 30;

/// Path appended to the self-ping base URL
pub const SELF_PING_PATH: &str = "/ping";

/// User agent sent with self-ping requests
pub const SELF_PING_USER_AGENT: &str =
    formatcp!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

// =============================================================================
// Default Values and Environment Variables
// =============================================================================

/// Default listen address (all interfaces)
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port when PORT is not set
pub const DEFAULT_PORT: u16 = 3000;

/// Host used to build the default self-ping URL
pub const DEFAULT_SELF_HOST: &str = "localhost";

/// Environment variable holding the listen port
pub const PORT_ENV: &str = "PORT";

/// Environment variable holding the self-ping base URL
pub const SELF_URL_ENV: &str = "SELF_URL";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "keepwarm=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP listener configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Self-ping timer configuration
    #[serde(default)]
    pub self_ping: SelfPingConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_PORT
    }
}

/// Self-ping configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelfPingConfig {
    /// Base URL the timer pings. Defaults to `http://localhost:<port>`.
    pub url: Option<String>,
}

impl SelfPingConfig {
    /// Get the effective base URL (configured or derived from the listen port)
    pub fn base_url(&self, http: &HttpServerConfig) -> String {
        self.url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", DEFAULT_SELF_HOST, http.port))
    }

    /// Build the full `/ping` target from the effective base URL.
    ///
    /// Trailing slashes on the base are dropped so `https://app.example.com/`
    /// and `https://app.example.com` resolve to the same target.
    pub fn target_url(&self, http: &HttpServerConfig) -> Result<Url, ConfigError> {
        let base = self.base_url(http);
        let target = format!("{}{}", base.trim_end_matches('/'), SELF_PING_PATH);
        Url::parse(&target).map_err(|e| {
            ConfigError::Validation(format!("Invalid self-ping URL '{}': {}", base, e))
        })
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    /// Resolve the configuration from the optional file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Overlay `PORT` and `SELF_URL` from an environment lookup.
    ///
    /// Empty values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = non_empty(PORT_ENV) {
            self.http.port = port.trim().parse().map_err(|_| {
                ConfigError::Validation(format!(
                    "{} must be a port number, got '{}'",
                    PORT_ENV, port
                ))
            })?;
        }

        if let Some(url) = non_empty(SELF_URL_ENV) {
            self.self_ping.url = Some(url.trim().to_string());
        }

        Ok(())
    }

    /// Check settings that cannot be expressed in the types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.self_ping.target_url(&self.http)?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn resolved(pairs: &[(&str, &str)]) -> AppConfig {
        let mut config = AppConfig::default();
        config.apply_env(env(pairs)).unwrap();
        config
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = resolved(&[]);
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 3000);
        assert!(config.self_ping.url.is_none());
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_default_target_uses_resolved_port() {
        let config = resolved(&[]);
        let target = config.self_ping.target_url(&config.http).unwrap();
        assert_eq!(target.as_str(), "http://localhost:3000/ping");
    }

    #[test]
    fn test_port_from_environment() {
        let config = resolved(&[("PORT", "8081")]);
        assert_eq!(config.http.port, 8081);

        let target = config.self_ping.target_url(&config.http).unwrap();
        assert_eq!(target.as_str(), "http://localhost:8081/ping");
    }

    #[test]
    fn test_empty_port_counts_as_unset() {
        let config = resolved(&[("PORT", "")]);
        assert_eq!(config.http.port, DEFAULT_PORT);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let mut config = AppConfig::default();
        let err = config.apply_env(env(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = config.apply_env(env(&[("PORT", "70000")])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_self_url_from_environment() {
        let config = resolved(&[("PORT", "4000"), ("SELF_URL", "https://app.example.com")]);
        let target = config.self_ping.target_url(&config.http).unwrap();
        assert_eq!(target.as_str(), "https://app.example.com/ping");
    }

    #[test]
    fn test_self_url_trailing_slash_is_dropped() {
        let config = resolved(&[("SELF_URL", "https://app.example.com/")]);
        let target = config.self_ping.target_url(&config.http).unwrap();
        assert_eq!(target.as_str(), "https://app.example.com/ping");
    }

    #[test]
    fn test_self_url_with_path_prefix() {
        let config = resolved(&[("SELF_URL", "https://example.com/keepwarm")]);
        let target = config.self_ping.target_url(&config.http).unwrap();
        assert_eq!(target.as_str(), "https://example.com/keepwarm/ping");
    }

    #[test]
    fn test_invalid_self_url_fails_validation() {
        let config = resolved(&[("SELF_URL", "not a url")]);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_environment_overrides_file() {
        let mut config: AppConfig = toml::from_str(
            r#"
            [http]
            port = 9000

            [self_ping]
            url = "http://internal:9000"
            "#,
        )
        .unwrap();
        config
            .apply_env(env(&[("SELF_URL", "https://public.example.com")]))
            .unwrap();

        assert_eq!(config.http.port, 9000);
        assert_eq!(config.http.host, DEFAULT_HOST);
        assert_eq!(
            config.self_ping.base_url(&config.http),
            "https://public.example.com"
        );
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.http.port, DEFAULT_PORT);
        assert_eq!(config.logging.format, DEFAULT_LOG_FORMAT);
    }

    #[test]
    fn test_json_log_format() {
        let config: AppConfig = toml::from_str("[logging]\nformat = \"JSON\"").unwrap();
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_default_log_filter_only_targets_this_crate() {
        assert_eq!(DEFAULT_LOG_FILTER, "keepwarm=info");
    }

    #[test]
    fn test_self_ping_interval_is_10_minutes() {
        assert_eq!(SELF_PING_INTERVAL_SECS, 600);
    }

    #[test]
    fn test_user_agent_carries_version() {
        assert_eq!(
            SELF_PING_USER_AGENT,
            concat!("keepwarm/", env!("CARGO_PKG_VERSION"))
        );
    }
}
