//! Broker configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::HeaderValue;

/// Default admission domain.
pub const DEFAULT_EMAIL_DOMAIN: &str = "vitbhopal.ac.in";

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `LISTEN_ADDR` (or the address derived from `PORT`) is not a socket
    /// address.
    #[error("invalid listen address {value:?}: {source}")]
    InvalidListenAddr {
        /// The offending value.
        value: String,
        /// Parser error.
        source: std::net::AddrParseError,
    },

    /// `ALLOWED_EMAIL_DOMAIN` is empty or contains `@` or whitespace.
    #[error("invalid email domain {0:?}")]
    InvalidEmailDomain(String),

    /// An entry of `CORS_ALLOWED_ORIGINS` is not a valid header value.
    #[error("invalid CORS origin {0:?}")]
    InvalidCorsOrigin(String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level broker configuration.
///
/// Loaded once at startup via [`BrokerConfig::from_env`].
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3001`).
    pub listen_addr: SocketAddr,

    /// Domain every admitted email must belong to.
    pub allowed_email_domain: String,

    /// Capacity of each connection's outbound event channel.
    pub outbound_buffer: usize,

    /// Allowed CORS origins. Empty means permissive.
    pub cors_allowed_origins: Vec<HeaderValue>,

    /// Timeout applied to plain HTTP requests (not to `/ws`).
    pub request_timeout: Duration,

    /// Log output format.
    pub log_format: LogFormat,
}

impl BrokerConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a set variable cannot be used.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a present value cannot be used.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_value = lookup("LISTEN_ADDR").unwrap_or_else(|| {
            let port = lookup("PORT").unwrap_or_else(|| "3001".to_string());
            format!("0.0.0.0:{port}")
        });
        let listen_addr =
            listen_value
                .parse()
                .map_err(|source| ConfigError::InvalidListenAddr {
                    value: listen_value.clone(),
                    source,
                })?;

        let allowed_email_domain =
            lookup("ALLOWED_EMAIL_DOMAIN").unwrap_or_else(|| DEFAULT_EMAIL_DOMAIN.to_string());
        if allowed_email_domain.is_empty()
            || allowed_email_domain.contains('@')
            || allowed_email_domain.chars().any(char::is_whitespace)
        {
            return Err(ConfigError::InvalidEmailDomain(allowed_email_domain));
        }

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|_| ConfigError::InvalidCorsOrigin(origin.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            allowed_email_domain,
            outbound_buffer: parse_value(&lookup, "OUTBOUND_BUFFER", 64),
            cors_allowed_origins,
            request_timeout: Duration::from_secs(parse_value(&lookup, "REQUEST_TIMEOUT_SECS", 10)),
            log_format,
        })
    }
}

/// Parses a looked-up value as `T`, returning `default` on missing or
/// invalid values.
fn parse_value<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
