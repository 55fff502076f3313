//! Market Rate Tests
//!
//! Refresh semantics of the rate board against the static quote adapter
//! and a failing feed.

use async_trait::async_trait;
use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_zakat::liability::MarketRate;
use domain_zakat::{MarketRatePort, RateBoard, StaticQuoteAdapter, StaticQuoteConfig, ZakatError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

struct DownFeed;

impl DomainPort for DownFeed {}

#[async_trait]
impl HealthCheckable for DownFeed {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::unhealthy("down-feed", "offline")
    }
}

#[async_trait]
impl MarketRatePort for DownFeed {
    async fn gold_price_per_gram(&self) -> Result<Decimal, PortError> {
        Err(PortError::connection("feed offline"))
    }

    async fn fitr_per_person(&self) -> Result<Decimal, PortError> {
        Err(PortError::Timeout {
            operation: "fitr_per_person".to_string(),
            duration_ms: 700,
        })
    }
}

fn quotes(gold: Decimal, delay_ms: u64) -> StaticQuoteAdapter {
    StaticQuoteAdapter::new(StaticQuoteConfig {
        gold_per_gram: gold,
        fitr_per_person: dec!(60),
        delay: Duration::from_millis(delay_ms),
    })
}

#[tokio::test]
async fn test_refresh_all_sets_gold_and_fitr() {
    let board = RateBoard::new();
    let outcome = board.refresh_all(&StaticQuoteAdapter::instant()).await;
    assert!(outcome.all_succeeded());

    let rates = board.current().await;
    assert_eq!(rates.gold, Some(dec!(3500)));
    assert_eq!(rates.fitr, Some(dec!(60)));
    assert_eq!(rates.silver, None);
}

#[tokio::test]
async fn test_failed_refresh_clears_previous_value() {
    let board = RateBoard::new();
    board.set(MarketRate::Gold, Some(dec!(3400))).await;

    let err = board.refresh_gold(&DownFeed).await.unwrap_err();
    assert!(matches!(err, ZakatError::RateUnavailable { rate: "gold", .. }));
    assert_eq!(board.current().await.gold, None);
}

#[tokio::test]
async fn test_failure_leaves_manual_silver_alone() {
    let board = RateBoard::new();
    board.set(MarketRate::Silver, Some(dec!(45))).await;

    let outcome = board.refresh_all(&DownFeed).await;
    assert!(outcome.gold.is_err());
    assert!(outcome.fitr.is_err());
    assert_eq!(board.current().await.silver, Some(dec!(45)));
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_refreshes_last_resolved_wins() {
    let board = RateBoard::new();
    let slow = quotes(dec!(3000), 900);
    let fast = quotes(dec!(3600), 100);

    let (a, b) = tokio::join!(board.refresh_gold(&slow), board.refresh_gold(&fast));
    assert_eq!(a.unwrap(), dec!(3000));
    assert_eq!(b.unwrap(), dec!(3600));

    // The slow feed resolved last
    assert_eq!(board.current().await.gold, Some(dec!(3000)));
}

#[tokio::test(start_paused = true)]
async fn test_each_refresh_updates_once() {
    let board = RateBoard::new();
    let adapter = quotes(dec!(3500), 700);

    board.refresh_gold(&adapter).await.unwrap();
    board.refresh_gold(&adapter).await.unwrap();
    assert_eq!(adapter.lookups(), 2);
}
