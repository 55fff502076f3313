//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating ledgers that respect the
//! domain's invariants: positive quantities, known kinds, and valuation
//! dates no later than the fixture "today".

use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_zakat::{AssetEntry, AssetKind, MarketRates};

use crate::builders::AssetEntryBuilder;

/// Strategy for any asset kind
pub fn asset_kind_strategy() -> impl Strategy<Value = AssetKind> {
    prop::sample::select(AssetKind::ALL.to_vec())
}

/// Strategy for positive quantities with up to two decimal places
pub fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for a market rate that may be missing
pub fn optional_rate_strategy() -> impl Strategy<Value = Option<Decimal>> {
    prop::option::of((1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2)))
}

/// Strategy for a full set of market rates
pub fn market_rates_strategy() -> impl Strategy<Value = MarketRates> {
    (
        optional_rate_strategy(),
        optional_rate_strategy(),
        optional_rate_strategy(),
    )
        .prop_map(|(gold, silver, fitr)| MarketRates::new(gold, silver, fitr))
}

/// Strategy for days back from today to a valuation date
///
/// Spans up to thirty hawls so that the period cap is exercised.
pub fn days_back_strategy() -> impl Strategy<Value = u64> {
    0u64..10_700u64
}

/// Strategy for a single entry with some periods paid
pub fn asset_entry_strategy() -> impl Strategy<Value = AssetEntry> {
    (
        asset_kind_strategy(),
        quantity_strategy(),
        days_back_strategy(),
        prop::collection::vec(any::<bool>(), 0..20),
    )
        .prop_map(|(kind, quantity, days_back, paid)| {
            let mut builder = AssetEntryBuilder::new()
                .with_kind(kind)
                .with_quantity(quantity)
                .valued_days_ago(days_back);
            if kind == AssetKind::Stocks {
                builder = builder.with_label("TEST");
            }
            for (index, _) in paid.iter().enumerate().filter(|(_, p)| **p) {
                builder = builder.with_paid_period(index);
            }
            builder.build()
        })
}

/// Strategy for a ledger of up to `max` entries
pub fn ledger_strategy(max: usize) -> impl Strategy<Value = Vec<AssetEntry>> {
    prop::collection::vec(asset_entry_strategy(), 0..=max)
}
