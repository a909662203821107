//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults match the local docker-compose
//! port layout of the backend services.
//!
//! - `PRODUCT_SERVICE_URL` - Product service base URL (default: `http://localhost:8000`)
//! - `ORDER_SERVICE_URL` - Order service base URL (default: `http://localhost:8001`)
//! - `CUSTOMER_SERVICE_URL` - Customer service base URL (default: `http://localhost:8002`)
//! - `ORDER_POLL_SECS` - Seconds between background order refetches (default: 10)
//! - `CATALOG_POLL_SECS` - Seconds between background catalog refetches (default: 15)

use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_PRODUCT_SERVICE_URL: &str = "http://localhost:8000";
const DEFAULT_ORDER_SERVICE_URL: &str = "http://localhost:8001";
const DEFAULT_CUSTOMER_SERVICE_URL: &str = "http://localhost:8002";
const DEFAULT_ORDER_POLL_SECS: u64 = 10;
const DEFAULT_CATALOG_POLL_SECS: u64 = 15;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Console application configuration.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Product service base URL
    pub product_service_url: Url,
    /// Order service base URL
    pub order_service_url: Url,
    /// Customer service base URL
    pub customer_service_url: Url,
    /// Interval between background order refetches
    pub order_poll: Duration,
    /// Interval between background catalog refetches
    pub catalog_poll: Duration,
}

impl ConsoleConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the offending variable if a URL does
    /// not parse or an interval is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            product_service_url: env_url("PRODUCT_SERVICE_URL", DEFAULT_PRODUCT_SERVICE_URL)?,
            order_service_url: env_url("ORDER_SERVICE_URL", DEFAULT_ORDER_SERVICE_URL)?,
            customer_service_url: env_url("CUSTOMER_SERVICE_URL", DEFAULT_CUSTOMER_SERVICE_URL)?,
            order_poll: env_secs("ORDER_POLL_SECS", DEFAULT_ORDER_POLL_SECS)?,
            catalog_poll: env_secs("CATALOG_POLL_SECS", DEFAULT_CATALOG_POLL_SECS)?,
        })
    }
}

fn env_url(name: &str, default: &str) -> Result<Url, ConfigError> {
    parse_url(name, &env::var(name).unwrap_or_else(|_| default.to_string()))
}

fn env_secs(name: &str, default: u64) -> Result<Duration, ConfigError> {
    match env::var(name) {
        Ok(raw) => parse_secs(name, &raw),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

fn parse_url(name: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(name.to_string(), e.to_string()))
}

fn parse_secs(name: &str, raw: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = raw.parse().map_err(|_| {
        ConfigError::InvalidEnvVar(name.to_string(), format!("`{raw}` is not a number of seconds"))
    })?;
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            name.to_string(),
            "interval must be at least one second".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let url = env_url("SHOPDECK_TEST_UNSET_URL", DEFAULT_PRODUCT_SERVICE_URL)
            .expect("default must parse");
        assert_eq!(url.as_str(), "http://localhost:8000/");

        let secs =
            env_secs("SHOPDECK_TEST_UNSET_SECS", DEFAULT_ORDER_POLL_SECS).expect("default secs");
        assert_eq!(secs, Duration::from_secs(10));
    }

    #[test]
    fn invalid_url_names_the_variable() {
        let err = parse_url("PRODUCT_SERVICE_URL", "not a url").unwrap_err();
        assert!(err.to_string().contains("PRODUCT_SERVICE_URL"));
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(parse_secs("ORDER_POLL_SECS", "0").is_err());
        assert!(parse_secs("ORDER_POLL_SECS", "ten").is_err());
        assert_eq!(
            parse_secs("ORDER_POLL_SECS", "10").expect("valid interval"),
            Duration::from_secs(10)
        );
    }
}
