//! Background job that keeps the process warm by pinging itself.
//!
//! Some hosting platforms suspend services that receive no traffic. This job
//! issues `GET <base_url>/ping` on a fixed period for the whole life of the
//! process. A failed ping is logged and otherwise ignored; the next tick is
//! the only retry.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::config::{
    AppConfig, ConfigError, SELF_PING_INTERVAL_SECS, SELF_PING_TIMEOUT_SECS, SELF_PING_USER_AGENT,
};

#[derive(Debug, thiserror::Error)]
pub enum SelfPingError {
    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Periodic self-ping of a single target URL.
#[derive(Debug, Clone)]
pub struct SelfPinger {
    client: Client,
    target: Url,
    period: Duration,
}

impl SelfPinger {
    /// Build a pinger for the configured target with the fixed 10 minute period.
    pub fn from_config(config: &AppConfig) -> Result<Self, SelfPingError> {
        let target = config.self_ping.target_url(&config.http)?;
        Self::new(target, Duration::from_secs(SELF_PING_INTERVAL_SECS))
    }

    pub fn new(target: Url, period: Duration) -> Result<Self, SelfPingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(SELF_PING_TIMEOUT_SECS))
            .user_agent(SELF_PING_USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            target,
            period,
        })
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Issue one ping and return the response status.
    ///
    /// Any HTTP response counts as success; only transport failures are errors.
    pub async fn ping_once(&self) -> Result<StatusCode, reqwest::Error> {
        let response = self.client.get(self.target.clone()).send().await?;
        Ok(response.status())
    }

    /// Issue one ping and log the outcome. Never fails.
    pub async fn tick(&self) {
        match self.ping_once().await {
            Ok(status) => {
                tracing::info!(
                    target_url = %self.target,
                    status = status.as_u16(),
                    "🔁 Self ping"
                );
            }
            Err(e) => {
                tracing::error!(target_url = %self.target, error = %e, "❌ Ping error");
            }
        }
    }

    /// Start the job on the current runtime.
    ///
    /// The first ping fires one full period after this call. The task has no
    /// stop condition and is expected to live until the process exits.
    #[must_use]
    pub fn spawn(self) -> JoinHandle<()> {
        tracing::info!(
            target_url = %self.target,
            period_secs = self.period.as_secs(),
            "Self-ping job armed"
        );

        tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + self.period, self.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                self.tick().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_uses_default_target_and_period() {
        let pinger = SelfPinger::from_config(&AppConfig::default()).unwrap();
        assert_eq!(pinger.target().as_str(), "http://localhost:3000/ping");
        assert_eq!(pinger.period(), Duration::from_secs(600));
    }

    #[test]
    fn test_from_config_rejects_invalid_url() {
        let mut config = AppConfig::default();
        config.self_ping.url = Some("::nope::".to_string());
        assert!(matches!(
            SelfPinger::from_config(&config),
            Err(SelfPingError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_ping_once_reports_connection_error() {
        // Bind then drop to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let target = Url::parse(&format!("http://127.0.0.1:{}/ping", port)).unwrap();
        let pinger = SelfPinger::new(target, Duration::from_secs(600)).unwrap();
        let err = pinger.ping_once().await.unwrap_err();
        assert!(err.is_connect());
    }
}
