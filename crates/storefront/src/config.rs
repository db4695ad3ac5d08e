//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults start a local demo shop.
//!
//! - `CAFEGO_DATABASE_URL` - `SQLite` connection string
//!   (default: `sqlite://cafego.db?mode=rwc`, falls back to `DATABASE_URL`)
//! - `CAFEGO_HOST` - Bind address (default: 127.0.0.1)
//! - `CAFEGO_PORT` - Listen port (default: 5000)
//! - `CAFEGO_SECURE_COOKIES` - Mark the session cookie `Secure` (default: false)
//! - `CAFEGO_LOG_JSON` - Emit logs as JSON lines (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Default `SQLite` database, created next to the working directory.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://cafego.db?mode=rwc";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `SQLite` database connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Whether the session cookie carries the `Secure` attribute
    pub secure_cookies: bool,
    /// Emit logs as JSON lines instead of human-readable text
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production", "staging")
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced by Sentry
    pub sentry_traces_sample_rate: f32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            database_url: SecretString::from(DEFAULT_DATABASE_URL),
            host: IpAddr::from([127, 0, 0, 1]),
            port: 5000,
            secure_cookies: false,
            json_logs: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = database_url_from_env();
        let host = parse_env("CAFEGO_HOST", "127.0.0.1")?;
        let port = parse_env("CAFEGO_PORT", "5000")?;
        let secure_cookies = parse_bool_env("CAFEGO_SECURE_COOKIES", false)?;
        let json_logs = parse_bool_env("CAFEGO_LOG_JSON", false)?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = parse_rate_env("SENTRY_SAMPLE_RATE", "1.0")?;
        let sentry_traces_sample_rate = parse_rate_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?;

        Ok(Self {
            database_url,
            host,
            port,
            secure_cookies,
            json_logs,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Resolve the database URL: `CAFEGO_DATABASE_URL`, then the generic
/// `DATABASE_URL`, then [`DEFAULT_DATABASE_URL`].
///
/// Shared with the CLI so both binaries open the same database.
#[must_use]
pub fn database_url_from_env() -> SecretString {
    resolve_database_url(
        std::env::var("CAFEGO_DATABASE_URL").ok(),
        std::env::var("DATABASE_URL").ok(),
    )
}

fn resolve_database_url(primary: Option<String>, generic: Option<String>) -> SecretString {
    primary.or(generic).map_or_else(
        || SecretString::from(DEFAULT_DATABASE_URL),
        SecretString::from,
    )
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a boolean flag. Accepts `true/false`, `1/0`, `yes/no`.
fn parse_bool_env(key: &str, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = get_optional_env(key) else {
        return Ok(default);
    };
    parse_bool(&value).ok_or_else(|| {
        ConfigError::InvalidEnvVar(key.to_string(), format!("expected a boolean, got {value:?}"))
    })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Parse a sample rate in the closed range 0.0-1.0.
fn parse_rate_env(key: &str, default: &str) -> Result<f32, ConfigError> {
    let rate: f32 = parse_env(key, default)?;
    validate_rate(rate).map_err(|msg| ConfigError::InvalidEnvVar(key.to_string(), msg))
}

fn validate_rate(rate: f32) -> Result<f32, String> {
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(format!("must be between 0.0 and 1.0 (got {rate})"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert_eq!(config.database_url.expose_secret(), DEFAULT_DATABASE_URL);
        assert_eq!(config.port, 5000);
        assert!(!config.secure_cookies);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_database_url_precedence() {
        let url = |primary: Option<&str>, generic: Option<&str>| {
            resolve_database_url(primary.map(str::to_owned), generic.map(str::to_owned))
                .expose_secret()
                .to_owned()
        };

        assert_eq!(
            url(Some("sqlite://shop.db"), Some("sqlite://other.db")),
            "sqlite://shop.db"
        );
        assert_eq!(url(None, Some("sqlite://other.db")), "sqlite://other.db");
        assert_eq!(url(None, None), DEFAULT_DATABASE_URL);
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "0.0.0.0".parse().unwrap(),
            port: 8080,
            ..StorefrontConfig::default()
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "0.0.0.0");
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_validate_rate_bounds() {
        assert!(validate_rate(0.0).is_ok());
        assert!(validate_rate(0.25).is_ok());
        assert!(validate_rate(1.0).is_ok());
        assert!(validate_rate(1.5).is_err());
        assert!(validate_rate(-0.1).is_err());
    }

    #[test]
    fn test_debug_does_not_leak_database_url() {
        let config = StorefrontConfig {
            database_url: SecretString::from("sqlite:///srv/private/shop.db"),
            ..StorefrontConfig::default()
        };

        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("/srv/private/shop.db"));
    }
}
