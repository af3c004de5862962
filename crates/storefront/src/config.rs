//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CANDY_API_URL` - API origin (default: `http://localhost:8000`)
//! - `CANDY_SESSION_PATH` - File holding the persisted session
//!   (default: `.candy-market/session.json`)
//! - `CANDY_SEARCH_DEBOUNCE_MS` - Catalog search debounce delay (default: 280)
//! - `CANDY_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default API origin for local development.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default debounce delay for catalog search edits.
pub const DEFAULT_DEBOUNCE_MS: u64 = 280;

const DEFAULT_SESSION_PATH: &str = ".candy-market/session.json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// API origin every request path is resolved against
    pub api_url: Url,
    /// Where the session token and identity are persisted
    pub session_path: PathBuf,
    /// Quiet period before a catalog search edit is sent
    pub search_debounce: Duration,
    /// Per-request timeout
    pub http_timeout: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Configuration for `api_url` with every other setting at its default.
    #[must_use]
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            session_path: PathBuf::from(DEFAULT_SESSION_PATH),
            search_debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set but cannot
    /// be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_api_url(&get_env_or_default("CANDY_API_URL", DEFAULT_API_URL))?;
        let session_path =
            PathBuf::from(get_env_or_default("CANDY_SESSION_PATH", DEFAULT_SESSION_PATH));
        let search_debounce = Duration::from_millis(get_parsed_or_default(
            "CANDY_SEARCH_DEBOUNCE_MS",
            DEFAULT_DEBOUNCE_MS,
        )?);
        let http_timeout = Duration::from_secs(get_parsed_or_default(
            "CANDY_HTTP_TIMEOUT_SECS",
            DEFAULT_TIMEOUT_SECS,
        )?);

        Ok(Self {
            session_path,
            search_debounce,
            http_timeout,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            ..Self::new(api_url)
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse and validate the API origin.
fn parse_api_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar("CANDY_API_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "CANDY_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a numeric environment variable with a default value.
fn get_parsed_or_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_url_valid() {
        let url = parse_api_url("https://api.candy.example").unwrap();
        assert_eq!(url.host_str(), Some("api.candy.example"));
    }

    #[test]
    fn test_parse_api_url_rejects_relative() {
        assert!(matches!(
            parse_api_url("localhost:8000/api"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(parse_api_url("/api").is_err());
    }

    #[test]
    fn test_parse_api_url_rejects_other_schemes() {
        assert!(parse_api_url("ftp://files.example").is_err());
    }

    #[test]
    fn test_new_fills_defaults_around_the_origin() {
        let config = StorefrontConfig::new(parse_api_url(DEFAULT_API_URL).unwrap());
        assert_eq!(config.api_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.session_path, PathBuf::from(".candy-market/session.json"));
        assert_eq!(config.search_debounce, Duration::from_millis(280));
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert!(config.sentry_dsn.is_none());
    }
}
