//! API configuration

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use core_kernel::{Currency, Timezone};
use domain_zakat::StaticQuoteConfig;

/// API configuration
///
/// Every field can be set through a `ZAKAT_`-prefixed environment variable,
/// e.g. `ZAKAT_PORT=9000` or `ZAKAT_DATA_DIR=/var/lib/zakat`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Directory holding the ledger files
    pub data_dir: PathBuf,
    /// Log level
    pub log_level: String,
    /// Reporting currency
    pub currency: Currency,
    /// Timezone used to decide what "today" is
    pub timezone: Timezone,
    /// Delay before each mock quote resolves, in milliseconds
    pub quote_delay_ms: u64,
    /// Gold price per gram served by the mock quote feed
    pub gold_per_gram: Decimal,
    /// Fitr value per person served by the mock quote feed
    pub fitr_per_person: Decimal,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let quotes = StaticQuoteConfig::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            log_level: "info".to_string(),
            currency: Currency::default(),
            timezone: Timezone::default(),
            quote_delay_ms: quotes.delay.as_millis() as u64,
            gold_per_gram: quotes.gold_per_gram,
            fitr_per_person: quotes.fitr_per_person,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("ZAKAT"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Settings for the mock quote feed
    pub fn quote_config(&self) -> StaticQuoteConfig {
        StaticQuoteConfig {
            gold_per_gram: self.gold_per_gram,
            fitr_per_person: self.fitr_per_person,
            delay: Duration::from_millis(self.quote_delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_quote_feed() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.quote_config(), StaticQuoteConfig::default());
        assert_eq!(config.currency, Currency::EGP);
    }
}
