//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. `main` loads an optional `.env` file first.
//!
//! | Variable                         | Default          |
//! |----------------------------------|------------------|
//! | `BOOKSTORE_HOST`                 | `0.0.0.0`        |
//! | `BOOKSTORE_PORT`                 | `5000`           |
//! | `BOOKSTORE_DB_PATH`              | `./bookstore.db` |
//! | `BOOKSTORE_DB_MAX_CONNECTIONS`   | `5`              |
//! | `BOOKSTORE_REQUEST_TIMEOUT_MS`   | `15000`          |
//! | `BOOKSTORE_LOW_STOCK_THRESHOLD`  | `5`              |
//! | `BOOKSTORE_LOG_FORMAT`           | `pretty`         |

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, multi-line output for development.
    #[default]
    Pretty,
    /// One JSON object per line, for log shippers.
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub db_path: String,

    /// Upper bound on pooled SQLite connections
    pub db_max_connections: u32,

    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,

    /// Default threshold for `/api/books/low-stock`
    pub low_stock_threshold: i64,

    /// Log output format
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 5000,
            db_path: "./bookstore.db".to_string(),
            db_max_connections: 5,
            request_timeout_ms: 15_000,
            low_stock_threshold: 5,
            log_format: LogFormat::Pretty,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();

        let config = ServerConfig {
            host: lookup("BOOKSTORE_HOST").unwrap_or(defaults.host),

            port: parse_or(&lookup, "BOOKSTORE_PORT", defaults.port)?,

            db_path: lookup("BOOKSTORE_DB_PATH").unwrap_or(defaults.db_path),

            db_max_connections: parse_or(
                &lookup,
                "BOOKSTORE_DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            )?,

            request_timeout_ms: parse_or(
                &lookup,
                "BOOKSTORE_REQUEST_TIMEOUT_MS",
                defaults.request_timeout_ms,
            )?,

            low_stock_threshold: parse_or(
                &lookup,
                "BOOKSTORE_LOW_STOCK_THRESHOLD",
                defaults.low_stock_threshold,
            )?,

            log_format: parse_or(&lookup, "BOOKSTORE_LOG_FORMAT", defaults.log_format)?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "BOOKSTORE_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        if config.low_stock_threshold < 0 {
            return Err(ConfigError::InvalidValue(
                "BOOKSTORE_LOW_STOCK_THRESHOLD".to_string(),
            ));
        }

        Ok(config)
    }

    /// Address the server listens on.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("BOOKSTORE_HOST".to_string()))
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.db_path, "./bookstore.db");
        assert_eq!(config.low_stock_threshold, 5);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert_eq!(config.socket_addr().unwrap().port(), 5000);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("BOOKSTORE_PORT", "8080"),
            ("BOOKSTORE_HOST", "127.0.0.1"),
            ("BOOKSTORE_LOG_FORMAT", "JSON"),
            ("BOOKSTORE_LOW_STOCK_THRESHOLD", "2"),
        ])
        .unwrap();
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.low_stock_threshold, 2);
    }

    #[test]
    fn test_invalid_values() {
        let err = load(&[("BOOKSTORE_PORT", "http")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for BOOKSTORE_PORT");

        assert!(load(&[("BOOKSTORE_LOG_FORMAT", "xml")]).is_err());
        assert!(load(&[("BOOKSTORE_DB_MAX_CONNECTIONS", "0")]).is_err());
        assert!(load(&[("BOOKSTORE_LOW_STOCK_THRESHOLD", "-1")]).is_err());
    }
}
