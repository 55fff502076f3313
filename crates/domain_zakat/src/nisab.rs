//! Nisab and hawl eligibility
//!
//! Reports, per asset kind, whether holdings reach the nisab threshold and
//! whether a full hawl has passed since the earliest valuation. The report
//! is informational: it never removes anything from the amount due.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use core_kernel::temporal::days_between;
use core_kernel::LUNAR_YEAR_DAYS;

use crate::asset::{AssetEntry, AssetKind};
use crate::error::ZakatError;
use crate::liability::{MarketRate, MarketRates};

/// Gold nisab in grams
pub const GOLD_NISAB_GRAMS: Decimal = dec!(85);

/// Silver nisab in grams
pub const SILVER_NISAB_GRAMS: Decimal = dec!(595);

/// Metal used to value the nisab of monetary assets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NisabStandard {
    Gold,
    #[default]
    Silver,
}

impl NisabStandard {
    pub fn grams(&self) -> Decimal {
        match self {
            NisabStandard::Gold => GOLD_NISAB_GRAMS,
            NisabStandard::Silver => SILVER_NISAB_GRAMS,
        }
    }

    fn market(&self) -> MarketRate {
        match self {
            NisabStandard::Gold => MarketRate::Gold,
            NisabStandard::Silver => MarketRate::Silver,
        }
    }
}

impl FromStr for NisabStandard {
    type Err = ZakatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gold" => Ok(NisabStandard::Gold),
            "silver" => Ok(NisabStandard::Silver),
            other => Err(ZakatError::validation(format!("Unknown nisab standard: {other}"))),
        }
    }
}

/// Outcome of a nisab comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NisabStatus {
    Met,
    NotMet,
    /// The kind has no nisab (fitr)
    NotApplicable,
    /// The threshold needs a market rate that is not available, or its
    /// value is too large to represent
    Unknown,
}

/// Eligibility of one asset kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindEligibility {
    pub kind: AssetKind,
    /// Sum of entry quantities of this kind
    pub holding: Decimal,
    /// Threshold the holding was compared against, in the holding's unit
    pub threshold: Option<Decimal>,
    pub nisab: NisabStatus,
    /// Earliest valuation date among the kind's entries
    pub earliest_valuation: Option<NaiveDate>,
    pub hawl_passed: bool,
}

impl KindEligibility {
    /// Whether zakat would be obligatory on this kind
    pub fn is_obligatory(&self) -> bool {
        self.hawl_passed && matches!(self.nisab, NisabStatus::Met | NisabStatus::NotApplicable)
    }
}

/// Eligibility of every kind present in the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityReport {
    pub standard: NisabStandard,
    pub as_of: NaiveDate,
    pub kinds: Vec<KindEligibility>,
}

/// Builds the eligibility report for `entries`
///
/// # Arguments
///
/// * `entries` - Ledger entries
/// * `rates` - Current market rates, used to value the monetary nisab
/// * `standard` - Metal the monetary nisab is valued in
/// * `today` - Reference date for the hawl check
pub fn assess_eligibility(
    entries: &[AssetEntry],
    rates: &MarketRates,
    standard: NisabStandard,
    today: NaiveDate,
) -> EligibilityReport {
    let mut groups: BTreeMap<AssetKind, (Decimal, Option<NaiveDate>)> = BTreeMap::new();
    for entry in entries {
        let (holding, earliest) = groups.entry(entry.kind).or_insert((Decimal::ZERO, None));
        *holding = holding.saturating_add(entry.quantity);
        if let Some(date) = entry.valuation_date {
            *earliest = Some(earliest.map_or(date, |e| e.min(date)));
        }
    }

    let kinds = groups
        .into_iter()
        .map(|(kind, (holding, earliest))| {
            let threshold = threshold_for(kind, rates, standard);
            let nisab = match (kind, threshold) {
                (AssetKind::Fitr, _) => NisabStatus::NotApplicable,
                (_, None) => NisabStatus::Unknown,
                (_, Some(t)) if holding >= t => NisabStatus::Met,
                (_, Some(_)) => NisabStatus::NotMet,
            };
            let hawl_passed = earliest
                .map(|date| days_between(date, today) >= LUNAR_YEAR_DAYS as i64)
                .unwrap_or(false);

            KindEligibility {
                kind,
                holding,
                threshold,
                nisab,
                earliest_valuation: earliest,
                hawl_passed,
            }
        })
        .collect();

    EligibilityReport {
        standard,
        as_of: today,
        kinds,
    }
}

fn threshold_for(kind: AssetKind, rates: &MarketRates, standard: NisabStandard) -> Option<Decimal> {
    match kind {
        AssetKind::Gold => Some(GOLD_NISAB_GRAMS),
        AssetKind::Silver => Some(SILVER_NISAB_GRAMS),
        AssetKind::Fitr => None,
        AssetKind::Cash | AssetKind::Stocks | AssetKind::Business => rates
            .usable(standard.market())
            .and_then(|price| standard.grams().checked_mul(price)),
    }
}
