//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use devdiary_infra::BackendConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs against the in-memory backend.
    pub backend: Option<BackendConfig>,
    pub session: SessionConfig,
}

/// How sessions are kept in the browser.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl: Duration,
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "devdiary_session".to_string(),
            ttl: Duration::from_secs(168 * 3600),
            secure: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let backend = env::var("BACKEND_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|base_url| BackendConfig {
                base_url,
                timeout: Duration::from_secs(parse_var("BACKEND_TIMEOUT_SECS").unwrap_or(10)),
            });

        let defaults = SessionConfig::default();
        let session = SessionConfig {
            cookie_name: env::var("SESSION_COOKIE_NAME").unwrap_or(defaults.cookie_name),
            ttl: parse_var::<u64>("SESSION_TTL_HOURS")
                .map(ttl_from_hours)
                .unwrap_or(defaults.ttl),
            secure: env::var("COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.secure),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            backend,
            session,
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Overflowing hour counts clamp instead of wrapping.
fn ttl_from_hours(hours: u64) -> Duration {
    Duration::from_secs(hours.saturating_mul(3600))
}
