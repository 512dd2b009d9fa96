//! Client configuration.
//!
//! The base URL is fixed per deployment; the mobile shells construct an
//! [`ApiConfig`] once at startup and hand it to [`crate::ApiClient`].
//! `from_env` exists for development builds and tests, where the backend
//! is usually a local instance selected via `.env`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Production API base URL.
const DEFAULT_BASE_URL: &str = "https://api.pawlink.app/v1";

/// HTTP request timeout in seconds.
/// 30s allows for slow mobile networks while failing fast enough for good UX.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Keychain service name the token pair is stored under.
const DEFAULT_SERVICE_NAME: &str = "pawlink";

/// Environment variable overriding the base URL.
const ENV_BASE_URL: &str = "PAWLINK_API_URL";

/// Environment variable overriding the request timeout (seconds).
const ENV_TIMEOUT_SECS: &str = "PAWLINK_TIMEOUT_SECS";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub service_name: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
        }
    }
}

impl ApiConfig {
    /// Config pointing at `base_url`, with default timeout and service name.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            ..Self::default()
        }
    }

    /// Config from the environment, falling back to production defaults.
    ///
    /// Loads `.env` first if one is present, then reads `PAWLINK_API_URL`
    /// and `PAWLINK_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let mut config = Self::default();
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            config.base_url = normalize_base_url(url);
        }
        if let Some(secs) = std::env::var(ENV_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout_secs = secs;
        }
        config
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Strip trailing slashes so endpoint paths join cleanly.
pub(crate) fn normalize_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_production() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "https://api.pawlink.app/v1");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_trailing_slash_is_stripped() {
        let config = ApiConfig::new("http://localhost:8080/");
        assert_eq!(config.base_url, "http://localhost:8080");
    }
}
