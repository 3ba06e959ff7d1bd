use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// `None` disables post-create notifications.
    pub url: Option<String>,
    pub timeout_secs: u64,
}

impl WebhookConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub static_dir: String,
    pub webhook: WebhookConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .context("DATABASE_URL not set in environment")?;

        let webhook = WebhookConfig {
            url: non_empty(std::env::var("WEBHOOK_URL").ok()),
            timeout_secs: webhook_timeout_secs(),
        };

        Ok(Self {
            database_url,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 10),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_or("APP_PORT", 8080),
            static_dir: std::env::var("STATIC_DIR").unwrap_or_else(|_| ".".into()),
            webhook,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// A zero timeout would fail every delivery.
fn webhook_timeout_secs() -> u64 {
    Some(parse_or("WEBHOOK_TIMEOUT_SECS", 5))
        .filter(|secs| *secs > 0)
        .unwrap_or(5)
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_webhook_url_counts_as_unset() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("   ".into())), None);
        assert_eq!(
            non_empty(Some(" https://hooks.local/new ".into())),
            Some("https://hooks.local/new".to_string())
        );
    }

    #[test]
    fn unparseable_numbers_fall_back_to_default() {
        std::env::set_var("SUGGESTION_BOX_TEST_PORT", "not-a-port");
        assert_eq!(parse_or::<u16>("SUGGESTION_BOX_TEST_PORT", 8080), 8080);
        assert_eq!(parse_or::<u16>("SUGGESTION_BOX_TEST_MISSING", 9090), 9090);
    }

    #[test]
    fn zero_webhook_timeout_falls_back_to_default() {
        std::env::set_var("WEBHOOK_TIMEOUT_SECS", "0");
        assert_eq!(webhook_timeout_secs(), 5);
        std::env::set_var("WEBHOOK_TIMEOUT_SECS", "12");
        assert_eq!(webhook_timeout_secs(), 12);
        std::env::remove_var("WEBHOOK_TIMEOUT_SECS");
        assert_eq!(webhook_timeout_secs(), 5);
    }

    #[test]
    fn webhook_timeout_is_in_seconds() {
        let cfg = WebhookConfig {
            url: None,
            timeout_secs: 5,
        };
        assert_eq!(cfg.timeout(), Duration::from_secs(5));
    }
}
