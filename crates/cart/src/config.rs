//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `CART_API_URL` - Base URL of the product/stock API (default: `http://localhost:3333`)
//! - `CART_STORAGE_DIR` - Directory holding the persisted cart (default: `.rocketshoes`)
//! - `CART_STORAGE_KEY` - Key the cart blob is stored under (default: `@RocketShoes:cart`)
//! - `CART_HTTP_TIMEOUT_SECS` - Per-request timeout for API calls (default: 10)
//! - `CART_CATALOG_CACHE_TTL_SECS` - How long product records are cached (default: 300)
//! - `CART_LOG_FORMAT` - `pretty` or `json` (default: `pretty`)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default key the serialized cart is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

const DEFAULT_API_URL: &str = "http://localhost:3333";
const DEFAULT_STORAGE_DIR: &str = ".rocketshoes";
const DEFAULT_HTTP_TIMEOUT_SECS: &str = "10";
const DEFAULT_CACHE_TTL_SECS: &str = "300";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'pretty' or 'json', got '{other}'")),
        }
    }
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Base URL of the product and stock API
    pub api_url: Url,
    /// Directory the file store writes into
    pub storage_dir: PathBuf,
    /// Key the cart blob is stored under
    pub storage_key: String,
    /// Timeout applied to each API request
    pub http_timeout: Duration,
    /// Time-to-live for cached product records
    pub catalog_cache_ttl: Duration,
    /// Log output format
    pub log_format: LogFormat,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let api_url = parse_api_url("CART_API_URL", &get("CART_API_URL", DEFAULT_API_URL))?;
        let storage_dir = PathBuf::from(get("CART_STORAGE_DIR", DEFAULT_STORAGE_DIR));
        let storage_key = get("CART_STORAGE_KEY", DEFAULT_STORAGE_KEY);
        if storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }
        let http_timeout = parse_secs(
            "CART_HTTP_TIMEOUT_SECS",
            &get("CART_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS),
        )?;
        let catalog_cache_ttl = parse_secs(
            "CART_CATALOG_CACHE_TTL_SECS",
            &get("CART_CATALOG_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS),
        )?;
        let log_format = get("CART_LOG_FORMAT", "pretty")
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::InvalidEnvVar("CART_LOG_FORMAT".to_string(), e))?;

        Ok(Self {
            api_url,
            storage_dir,
            storage_key,
            http_timeout,
            catalog_cache_ttl,
            log_format,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse the API base URL, normalizing it to end with `/` so relative joins
/// keep any path prefix.
fn parse_api_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an absolute http(s) URL".to_string(),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Parse a whole number of seconds.
fn parse_secs(key: &str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CartConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:3333/");
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert_eq!(config.catalog_cache_ttl, Duration::from_secs(300));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = CartConfig::from_lookup(lookup_from(&[
            ("CART_API_URL", "https://api.example.com/v1"),
            ("CART_STORAGE_DIR", "/tmp/cart"),
            ("CART_STORAGE_KEY", "cart"),
            ("CART_HTTP_TIMEOUT_SECS", "3"),
            ("CART_CATALOG_CACHE_TTL_SECS", "0"),
            ("CART_LOG_FORMAT", "JSON"),
        ]))
        .unwrap();
        assert_eq!(config.api_url.as_str(), "https://api.example.com/v1/");
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/cart"));
        assert_eq!(config.storage_key, "cart");
        assert_eq!(config.http_timeout, Duration::from_secs(3));
        assert_eq!(config.catalog_cache_ttl, Duration::ZERO);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values() {
        let err = CartConfig::from_lookup(lookup_from(&[("CART_API_URL", "not a url")]));
        assert!(matches!(err, Err(ConfigError::InvalidEnvVar(ref k, _)) if k == "CART_API_URL"));

        let err = CartConfig::from_lookup(lookup_from(&[("CART_HTTP_TIMEOUT_SECS", "ten")]));
        assert!(err.is_err());

        let err = CartConfig::from_lookup(lookup_from(&[("CART_LOG_FORMAT", "xml")]));
        assert!(err.is_err());

        let err = CartConfig::from_lookup(lookup_from(&[("CART_STORAGE_KEY", "  ")]));
        assert!(err.is_err());
    }
}
