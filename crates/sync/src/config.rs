//! Engine configuration, constructed once per invocation.
//!
//! Every component takes a reference to [`SupplierConfig`] at construction;
//! nothing in the engine reads ambient process-wide state. The CLI loads the
//! struct from environment variables.
//!
//! # Environment Variables
//!
//! ## Required for API operations (checked at call time, not load time)
//! - `SUPERBALL_API_KEY` - B2B access key (Basic-Auth user, `X-Access-Key`
//!   header, feed `key` query parameter)
//! - `SUPERBALL_PASSWORD` - B2B password (Basic-Auth password)
//!
//! ## Optional
//! - `SUPERBALL_API_BASE_URL` - Order API base (default: production endpoint)
//! - `SUPERBALL_FEED_BASE_URL` - Feed export base (default: production endpoint)
//! - `SUPERBALL_IS_TESTING` - Send orders flagged `use_for_testing` (default: false)
//! - `SUPERBALL_PRICE_MARKUP` - Percent markup applied to feed prices, >= 0 (default: 0)
//! - `SUPERBALL_STOCK_UPDATE_ENABLED` - Periodic stock update switch (default: false)
//! - `SUPERBALL_STOCK_UPDATE_FREQUENCY` - `hourly`, `twice-daily`, or `daily` (default: daily)
//! - `SUPERBALL_LOG_SECRETS` - Write credential values to the diagnostic log (default: false)

use std::str::FromStr;

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Production order API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://b2b.green-future.ro/api-v1";

/// Production product/stock feed base URL.
pub const DEFAULT_FEED_BASE_URL: &str = "https://b2b.green-future.ro/api";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),
}

/// How often the host scheduler should trigger stock reconciliation.
///
/// The engine never runs a timer itself; the periodic trigger is the host's
/// concern. This enum only travels from settings to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StockUpdateFrequency {
    Hourly,
    TwiceDaily,
    #[default]
    Daily,
}

impl StockUpdateFrequency {
    /// Canonical settings-value spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::TwiceDaily => "twice-daily",
            Self::Daily => "daily",
        }
    }
}

impl FromStr for StockUpdateFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hourly" => Ok(Self::Hourly),
            "twice-daily" | "twicedaily" => Ok(Self::TwiceDaily),
            "daily" => Ok(Self::Daily),
            other => Err(format!(
                "unknown frequency '{other}' (expected hourly, twice-daily, or daily)"
            )),
        }
    }
}

/// Supplier integration settings.
///
/// Credentials are held as [`SecretString`] so `Debug` output never reveals
/// them. Empty credentials are representable on purpose: the original
/// integration surfaces a per-operation configuration error rather than
/// refusing to start, and the engine preserves that.
#[derive(Debug, Clone)]
pub struct SupplierConfig {
    /// Order API base URL.
    pub api_base_url: String,
    /// Feed export base URL.
    pub feed_base_url: String,
    /// B2B access key.
    pub api_key: SecretString,
    /// B2B password.
    pub password: SecretString,
    /// Orders are flagged `use_for_testing` when set.
    pub is_testing: bool,
    /// Percent markup applied to feed prices on import. Never negative.
    pub price_markup: Decimal,
    /// Whether the host scheduler should run periodic stock updates.
    pub stock_update_enabled: bool,
    /// Requested stock update cadence.
    pub stock_update_frequency: StockUpdateFrequency,
    /// Write credential values to the diagnostic log. Debug aid only.
    pub log_secrets: bool,
}

impl SupplierConfig {
    /// Load configuration from `SUPERBALL_*` environment variables.
    ///
    /// Missing credentials load as empty secrets; the API and feed clients
    /// report `Config` errors at call time.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric or enum variable fails to parse, or if
    /// the markup is negative.
    pub fn from_env() -> Result<Self, ConfigError> {
        let markup_raw = env_or("SUPERBALL_PRICE_MARKUP", "0");
        let price_markup = Decimal::from_str(markup_raw.trim())
            .map_err(|e| ConfigError::InvalidEnvVar("SUPERBALL_PRICE_MARKUP", e.to_string()))?;
        if price_markup < Decimal::ZERO {
            return Err(ConfigError::InvalidEnvVar(
                "SUPERBALL_PRICE_MARKUP",
                "markup must not be negative".to_string(),
            ));
        }

        let stock_update_frequency = env_or("SUPERBALL_STOCK_UPDATE_FREQUENCY", "daily")
            .parse()
            .map_err(|e| ConfigError::InvalidEnvVar("SUPERBALL_STOCK_UPDATE_FREQUENCY", e))?;

        Ok(Self {
            api_base_url: env_or("SUPERBALL_API_BASE_URL", DEFAULT_API_BASE_URL),
            feed_base_url: env_or("SUPERBALL_FEED_BASE_URL", DEFAULT_FEED_BASE_URL),
            api_key: SecretString::from(env_or("SUPERBALL_API_KEY", "")),
            password: SecretString::from(env_or("SUPERBALL_PASSWORD", "")),
            is_testing: env_flag("SUPERBALL_IS_TESTING"),
            price_markup,
            stock_update_enabled: env_flag("SUPERBALL_STOCK_UPDATE_ENABLED"),
            stock_update_frequency,
            log_secrets: env_flag("SUPERBALL_LOG_SECRETS"),
        })
    }

    /// Whether both credentials are present (non-empty).
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.expose_secret().is_empty() && !self.password.expose_secret().is_empty()
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_parses_canonical_values() {
        assert_eq!(
            "hourly".parse::<StockUpdateFrequency>().unwrap(),
            StockUpdateFrequency::Hourly
        );
        assert_eq!(
            "Twice-Daily".parse::<StockUpdateFrequency>().unwrap(),
            StockUpdateFrequency::TwiceDaily
        );
        assert_eq!(
            "daily".parse::<StockUpdateFrequency>().unwrap(),
            StockUpdateFrequency::Daily
        );
        assert!("weekly".parse::<StockUpdateFrequency>().is_err());
    }

    #[test]
    fn frequency_round_trips_as_str() {
        for f in [
            StockUpdateFrequency::Hourly,
            StockUpdateFrequency::TwiceDaily,
            StockUpdateFrequency::Daily,
        ] {
            assert_eq!(f.as_str().parse::<StockUpdateFrequency>().unwrap(), f);
        }
    }

    #[test]
    fn has_credentials_requires_both() {
        let mut config = crate::testing::test_config();
        assert!(config.has_credentials());
        config.password = SecretString::from("");
        assert!(!config.has_credentials());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = crate::testing::test_config();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
    }
}
