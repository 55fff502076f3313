//! Ledger-wide aggregation
//!
//! Sums the liability of every unpaid period across all entries and groups
//! it by asset kind. Grouping is by kind, never by position, so the result
//! does not depend on the order entries are supplied in.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use core_kernel::{Currency, Money};

use crate::asset::{AssetEntry, AssetKind};
use crate::liability::{compute_liability, MarketRates};

/// One line of the per-kind breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub kind: AssetKind,
    pub label: String,
    pub amount: Decimal,
}

/// Total zakat due and its breakdown by kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZakatResult {
    /// Currency the amounts are expressed in
    #[serde(default)]
    pub currency: Currency,
    /// Sum of liability over all unpaid periods
    pub total: Decimal,
    /// One row per kind present, in canonical kind order
    pub breakdown: Vec<BreakdownRow>,
    /// Number of unpaid periods contributing to the total
    #[serde(default)]
    pub unpaid_periods: usize,
}

impl ZakatResult {
    /// An empty result
    pub fn empty(currency: Currency) -> Self {
        Self {
            currency,
            total: cents(Decimal::ZERO),
            breakdown: Vec::new(),
            unpaid_periods: 0,
        }
    }

    /// The total as money
    pub fn total_money(&self) -> Money {
        Money::new(self.total, self.currency)
    }

    /// Amount owed for `kind`, zero if the kind is absent
    pub fn amount_for(&self, kind: AssetKind) -> Decimal {
        self.breakdown
            .iter()
            .find(|row| row.kind == kind)
            .map(|row| row.amount)
            .unwrap_or(Decimal::ZERO)
    }
}

fn cents(mut value: Decimal) -> Decimal {
    value.rescale(2);
    value
}

/// Adds `amount` to `sum`, leaving it out if the sum would overflow
fn add_or_keep(sum: Decimal, amount: Decimal, kind: AssetKind) -> Decimal {
    sum.checked_add(amount).unwrap_or_else(|| {
        warn!(%kind, %amount, "Liability total overflowed, leaving amount out");
        sum
    })
}

/// Aggregates liability over all unpaid periods of `entries`
///
/// Each entry is valued at its own rate snapshots where present, falling
/// back to `rates`. Paid periods contribute nothing; a kind whose periods
/// are all paid still gets a zero row.
pub fn aggregate_liability(
    entries: &[AssetEntry],
    rates: &MarketRates,
    currency: Currency,
) -> ZakatResult {
    let mut by_kind: BTreeMap<AssetKind, Decimal> = BTreeMap::new();
    let mut unpaid_periods = 0;

    for entry in entries {
        let effective = entry.effective_rates(rates);
        let subtotal = by_kind.entry(entry.kind).or_insert(Decimal::ZERO);
        for period in entry.unpaid_periods() {
            let amount = compute_liability(period.principal, entry.kind, &effective);
            *subtotal = add_or_keep(*subtotal, amount, entry.kind);
            unpaid_periods += 1;
        }
    }

    let breakdown: Vec<BreakdownRow> = by_kind
        .into_iter()
        .map(|(kind, amount)| BreakdownRow {
            kind,
            label: kind.label().to_string(),
            amount: cents(amount),
        })
        .collect();

    let total = cents(
        breakdown
            .iter()
            .fold(Decimal::ZERO, |sum, row| add_or_keep(sum, row.amount, row.kind)),
    );

    ZakatResult {
        currency,
        total,
        breakdown,
        unpaid_periods,
    }
}
