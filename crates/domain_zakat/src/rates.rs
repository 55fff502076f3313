//! Shared market rates
//!
//! The rate board holds the current gold, silver and fitr rates for the
//! session. Rates come from a [`MarketRatePort`] refresh or a manual
//! override. Refreshes are not deduplicated: when two overlap, whichever
//! resolves last wins. A failed refresh clears the rate so that stale data
//! is never shown as current.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::ZakatError;
use crate::liability::{MarketRate, MarketRates};
use crate::ports::MarketRatePort;

/// Current rates and when they last changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub rates: MarketRates,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Results of refreshing every fetchable rate
#[derive(Debug)]
pub struct RefreshOutcome {
    pub gold: Result<Decimal, ZakatError>,
    pub fitr: Result<Decimal, ZakatError>,
}

impl RefreshOutcome {
    pub fn all_succeeded(&self) -> bool {
        self.gold.is_ok() && self.fitr.is_ok()
    }
}

/// Session-wide market rates, cheap to clone
#[derive(Debug, Clone, Default)]
pub struct RateBoard {
    inner: Arc<RwLock<RateSnapshot>>,
}

impl RateBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a board seeded with `rates`
    pub fn with_rates(rates: MarketRates) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RateSnapshot {
                rates,
                updated_at: Some(Utc::now()),
            })),
        }
    }

    pub async fn current(&self) -> MarketRates {
        self.inner.read().await.rates
    }

    pub async fn snapshot(&self) -> RateSnapshot {
        self.inner.read().await.clone()
    }

    /// Overrides one rate by hand; `None` clears it
    pub async fn set(&self, market: MarketRate, value: Option<Decimal>) {
        let mut snapshot = self.inner.write().await;
        match market {
            MarketRate::Gold => snapshot.rates.gold = value,
            MarketRate::Silver => snapshot.rates.silver = value,
            MarketRate::Fitr => snapshot.rates.fitr = value,
        }
        snapshot.updated_at = Some(Utc::now());
        info!(rate = market.name(), value = ?value, "Market rate set manually");
    }

    /// Fetches the gold price and stores it
    pub async fn refresh_gold(&self, port: &dyn MarketRatePort) -> Result<Decimal, ZakatError> {
        let fetched = port.gold_price_per_gram().await;
        self.record(MarketRate::Gold, fetched).await
    }

    /// Fetches the fitr value and stores it
    pub async fn refresh_fitr(&self, port: &dyn MarketRatePort) -> Result<Decimal, ZakatError> {
        let fetched = port.fitr_per_person().await;
        self.record(MarketRate::Fitr, fetched).await
    }

    /// Refreshes gold and fitr concurrently
    pub async fn refresh_all(&self, port: &dyn MarketRatePort) -> RefreshOutcome {
        let (gold, fitr) = tokio::join!(self.refresh_gold(port), self.refresh_fitr(port));
        RefreshOutcome { gold, fitr }
    }

    async fn record(
        &self,
        market: MarketRate,
        fetched: Result<Decimal, core_kernel::PortError>,
    ) -> Result<Decimal, ZakatError> {
        let value = match &fetched {
            Ok(v) => Some(*v),
            Err(_) => None,
        };

        {
            let mut snapshot = self.inner.write().await;
            match market {
                MarketRate::Gold => snapshot.rates.gold = value,
                MarketRate::Silver => snapshot.rates.silver = value,
                MarketRate::Fitr => snapshot.rates.fitr = value,
            }
            snapshot.updated_at = Some(Utc::now());
        }

        match fetched {
            Ok(v) => {
                info!(rate = market.name(), value = %v, "Market rate refreshed");
                Ok(v)
            }
            Err(e) => {
                warn!(rate = market.name(), error = %e, "Market rate unavailable");
                Err(ZakatError::rate_unavailable(market.name(), e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_manual_override() {
        let board = RateBoard::new();
        board.set(MarketRate::Silver, Some(dec!(45))).await;
        assert_eq!(board.current().await.silver, Some(dec!(45)));

        board.set(MarketRate::Silver, None).await;
        assert_eq!(board.current().await.silver, None);
    }

    #[tokio::test]
    async fn test_seeded_board() {
        let board = RateBoard::with_rates(MarketRates::new(Some(dec!(1)), None, Some(dec!(2))));
        let snapshot = board.snapshot().await;
        assert_eq!(snapshot.rates.fitr, Some(dec!(2)));
        assert!(snapshot.updated_at.is_some());
    }
}
