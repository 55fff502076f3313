//! Static quote adapter
//!
//! Serves fixed gold and fitr quotes after a configurable delay, the way a
//! slow network feed would. Each lookup sleeps independently, so concurrent
//! lookups overlap rather than queue.

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError};

use crate::ports::MarketRatePort;

/// Quotes and delay served by [`StaticQuoteAdapter`]
#[derive(Debug, Clone, PartialEq)]
pub struct StaticQuoteConfig {
    /// Gold price per gram
    pub gold_per_gram: Decimal,
    /// Fitr value per person
    pub fitr_per_person: Decimal,
    /// Delay before each quote resolves
    pub delay: Duration,
}

impl Default for StaticQuoteConfig {
    fn default() -> Self {
        Self {
            gold_per_gram: dec!(3500),
            fitr_per_person: dec!(60),
            delay: Duration::from_millis(700),
        }
    }
}

/// Mock market feed returning fixed quotes
#[derive(Debug, Default)]
pub struct StaticQuoteAdapter {
    config: StaticQuoteConfig,
    lookups: AtomicU64,
}

impl StaticQuoteAdapter {
    pub fn new(config: StaticQuoteConfig) -> Self {
        Self {
            config,
            lookups: AtomicU64::new(0),
        }
    }

    /// Same quotes with no delay
    pub fn instant() -> Self {
        Self::new(StaticQuoteConfig {
            delay: Duration::ZERO,
            ..StaticQuoteConfig::default()
        })
    }

    pub fn config(&self) -> &StaticQuoteConfig {
        &self.config
    }

    /// Number of lookups served so far
    pub fn lookups(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }

    async fn quote(&self, name: &'static str, value: Decimal) -> Result<Decimal, PortError> {
        if !self.config.delay.is_zero() {
            tokio::time::sleep(self.config.delay).await;
        }
        self.lookups.fetch_add(1, Ordering::Relaxed);
        if value <= Decimal::ZERO {
            return Err(PortError::ServiceUnavailable {
                service: format!("static {name} quote"),
            });
        }
        debug!(quote = name, value = %value, "Served static quote");
        Ok(value)
    }
}

impl DomainPort for StaticQuoteAdapter {}

#[async_trait]
impl HealthCheckable for StaticQuoteAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("static-quotes", 0)
    }
}

#[async_trait]
impl MarketRatePort for StaticQuoteAdapter {
    async fn gold_price_per_gram(&self) -> Result<Decimal, PortError> {
        self.quote("gold", self.config.gold_per_gram).await
    }

    async fn fitr_per_person(&self) -> Result<Decimal, PortError> {
        self.quote("fitr", self.config.fitr_per_person).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_quotes() {
        let adapter = StaticQuoteAdapter::instant();
        assert_eq!(adapter.gold_price_per_gram().await.unwrap(), dec!(3500));
        assert_eq!(adapter.fitr_per_person().await.unwrap(), dec!(60));
        assert_eq!(adapter.lookups(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quotes_resolve_after_delay() {
        let adapter = StaticQuoteAdapter::new(StaticQuoteConfig::default());
        let started = tokio::time::Instant::now();
        adapter.gold_price_per_gram().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(700));
    }

    #[tokio::test]
    async fn test_non_positive_quote_is_unavailable() {
        let adapter = StaticQuoteAdapter::new(StaticQuoteConfig {
            gold_per_gram: Decimal::ZERO,
            delay: Duration::ZERO,
            ..StaticQuoteConfig::default()
        });
        let err = adapter.gold_price_per_gram().await.unwrap_err();
        assert!(err.is_transient());
    }
}
