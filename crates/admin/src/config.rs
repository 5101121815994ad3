//! Admin tool configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `TANUKI_DATA_DIR` - Directory holding the JSON store (default: `.tanuki`)
//! - `TANUKI_RATES_URL` - Exchange rate endpoint (default: `https://ve.dolarapi.com/v1/dolares`)
//! - `TANUKI_HTTP_TIMEOUT_SECS` - Request timeout for the rate API (default: none)
//! - `TANUKI_LOG_FORMAT` - `pretty` or `json` (default: `pretty`)
//! - `RUST_LOG` - Log filter, read by the CLI's tracing subscriber

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Public endpoint listing Venezuelan dollar rates.
pub const DEFAULT_RATES_URL: &str = "https://ve.dolarapi.com/v1/dolares";

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = ".tanuki";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("expected `pretty` or `json`, got `{s}`")),
        }
    }
}

/// Admin tool configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Directory of the JSON key-value store
    pub data_dir: PathBuf,
    /// Exchange rate endpoint
    pub rates_url: Url,
    /// Optional request timeout for the rate API
    pub http_timeout: Option<Duration>,
    /// Log output format
    pub log_format: LogFormat,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = lookup("TANUKI_DATA_DIR")
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        let rates_url_raw =
            lookup("TANUKI_RATES_URL").unwrap_or_else(|| DEFAULT_RATES_URL.to_string());
        let rates_url = parse_http_url("TANUKI_RATES_URL", &rates_url_raw)?;

        let http_timeout = lookup("TANUKI_HTTP_TIMEOUT_SECS")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| {
                        ConfigError::InvalidEnvVar(
                            "TANUKI_HTTP_TIMEOUT_SECS".to_string(),
                            e.to_string(),
                        )
                    })
            })
            .transpose()?;

        let log_format = lookup("TANUKI_LOG_FORMAT")
            .map(|raw| {
                raw.parse::<LogFormat>()
                    .map_err(|e| ConfigError::InvalidEnvVar("TANUKI_LOG_FORMAT".to_string(), e))
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            data_dir,
            rates_url,
            http_timeout,
            log_format,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a URL and require an http(s) scheme.
fn parse_http_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme `{}`", url.scheme()),
        ));
    }
    Ok(url)
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
        let config = AdminConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".tanuki"));
        assert_eq!(config.rates_url.as_str(), DEFAULT_RATES_URL);
        assert_eq!(config.http_timeout, None);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = AdminConfig::from_lookup(lookup_from(&[
            ("TANUKI_DATA_DIR", "/var/lib/tanuki"),
            ("TANUKI_RATES_URL", "http://localhost:8080/v1/dolares"),
            ("TANUKI_HTTP_TIMEOUT_SECS", "5"),
            ("TANUKI_LOG_FORMAT", "JSON"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/tanuki"));
        assert_eq!(config.rates_url.port(), Some(8080));
        assert_eq!(config.http_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_blank_data_dir_uses_default() {
        let config = AdminConfig::from_lookup(lookup_from(&[("TANUKI_DATA_DIR", "  ")])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
    }

    #[test]
    fn test_invalid_url() {
        let result = AdminConfig::from_lookup(lookup_from(&[("TANUKI_RATES_URL", "not a url")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "TANUKI_RATES_URL"));
    }

    #[test]
    fn test_non_http_scheme() {
        let result =
            AdminConfig::from_lookup(lookup_from(&[("TANUKI_RATES_URL", "ftp://example.com/x")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_timeout() {
        let result = AdminConfig::from_lookup(lookup_from(&[("TANUKI_HTTP_TIMEOUT_SECS", "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_log_format() {
        let result = AdminConfig::from_lookup(lookup_from(&[("TANUKI_LOG_FORMAT", "xml")]));
        assert!(result.is_err());
    }
}
