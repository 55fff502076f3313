//! Liability formulas
//!
//! Each asset kind maps to one formula in a fixed table:
//!
//! | Kind                     | Liability                 |
//! |--------------------------|---------------------------|
//! | cash, stocks, business   | quantity × 0.025          |
//! | gold                     | quantity × gold × 0.025   |
//! | silver                   | quantity × silver × 0.025 |
//! | fitr                     | quantity × fitr           |
//!
//! A missing or non-positive market rate makes the contribution zero; it is
//! never an error. So does a product too large for `Decimal`, which is
//! logged. Results are rounded half-up to two decimal places.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use core_kernel::{round_half_up, Rate};

use crate::asset::AssetKind;
use crate::ZAKAT_RATE;

/// Rounds half-up to two decimal places
pub fn round2(value: Decimal) -> Decimal {
    round_half_up(value, 2)
}

/// Market rates in the reporting currency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketRates {
    /// Gold price per gram
    pub gold: Option<Decimal>,
    /// Silver price per gram
    pub silver: Option<Decimal>,
    /// Zakat al-Fitr value per person
    pub fitr: Option<Decimal>,
}

impl MarketRates {
    pub fn new(gold: Option<Decimal>, silver: Option<Decimal>, fitr: Option<Decimal>) -> Self {
        Self { gold, silver, fitr }
    }

    /// The rate for `market`, if present and positive
    pub fn usable(&self, market: MarketRate) -> Option<Decimal> {
        let rate = match market {
            MarketRate::Gold => self.gold,
            MarketRate::Silver => self.silver,
            MarketRate::Fitr => self.fitr,
        };
        rate.filter(|r| *r > Decimal::ZERO)
    }
}

/// Which market rate a formula reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketRate {
    Gold,
    Silver,
    Fitr,
}

impl MarketRate {
    pub fn name(&self) -> &'static str {
        match self {
            MarketRate::Gold => "gold",
            MarketRate::Silver => "silver",
            MarketRate::Fitr => "fitr",
        }
    }
}

/// How an asset kind's liability is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiabilityFormula {
    /// `quantity × rate`
    Flat(Rate),
    /// `quantity × market price × rate`
    MarketValue { market: MarketRate, rate: Rate },
    /// `quantity × market value per head`
    PerHead(MarketRate),
}

impl LiabilityFormula {
    /// The formula for `kind`
    pub const fn for_kind(kind: AssetKind) -> Self {
        match kind {
            AssetKind::Cash | AssetKind::Stocks | AssetKind::Business => {
                LiabilityFormula::Flat(ZAKAT_RATE)
            }
            AssetKind::Gold => LiabilityFormula::MarketValue {
                market: MarketRate::Gold,
                rate: ZAKAT_RATE,
            },
            AssetKind::Silver => LiabilityFormula::MarketValue {
                market: MarketRate::Silver,
                rate: ZAKAT_RATE,
            },
            AssetKind::Fitr => LiabilityFormula::PerHead(MarketRate::Fitr),
        }
    }

    /// The market rate this formula needs, if any
    pub fn market(&self) -> Option<MarketRate> {
        match self {
            LiabilityFormula::Flat(_) => None,
            LiabilityFormula::MarketValue { market, .. } | LiabilityFormula::PerHead(market) => {
                Some(*market)
            }
        }
    }

    /// Unrounded liability for `quantity`
    ///
    /// A missing rate gives `Some(0)`; `None` means the product overflowed.
    pub fn apply(&self, quantity: Decimal, rates: &MarketRates) -> Option<Decimal> {
        match self {
            LiabilityFormula::Flat(rate) => rate.checked_apply_to(quantity),
            LiabilityFormula::MarketValue { market, rate } => match rates.usable(*market) {
                Some(price) => quantity
                    .checked_mul(price)
                    .and_then(|value| rate.checked_apply_to(value)),
                None => Some(Decimal::ZERO),
            },
            LiabilityFormula::PerHead(market) => match rates.usable(*market) {
                Some(value) => quantity.checked_mul(value),
                None => Some(Decimal::ZERO),
            },
        }
    }
}

/// Computes the zakat due on `quantity` of `kind`
///
/// # Arguments
///
/// * `quantity` - Currency amount, grams or headcount depending on `kind`
/// * `kind` - The asset kind, selecting the formula
/// * `rates` - Market rates; only the one the formula needs is read
///
/// # Returns
///
/// The liability rounded half-up to two decimal places, or zero when the
/// needed rate is missing or the amount is too large to represent
pub fn compute_liability(quantity: Decimal, kind: AssetKind, rates: &MarketRates) -> Decimal {
    match LiabilityFormula::for_kind(kind).apply(quantity, rates) {
        Some(amount) => round2(amount),
        None => {
            warn!(%kind, %quantity, "Liability overflowed, counting it as zero");
            Decimal::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rates() -> MarketRates {
        MarketRates::new(Some(dec!(3500)), Some(dec!(45)), Some(dec!(60)))
    }

    #[test]
    fn test_cash_is_two_and_a_half_percent() {
        assert_eq!(compute_liability(dec!(10000), AssetKind::Cash, &rates()), dec!(250.00));
    }

    #[test]
    fn test_gold_uses_gold_rate() {
        assert_eq!(compute_liability(dec!(10), AssetKind::Gold, &rates()), dec!(875.00));
    }

    #[test]
    fn test_silver_uses_silver_rate() {
        assert_eq!(compute_liability(dec!(600), AssetKind::Silver, &rates()), dec!(675.00));
    }

    #[test]
    fn test_fitr_is_per_head() {
        assert_eq!(compute_liability(dec!(4), AssetKind::Fitr, &rates()), dec!(240.00));
    }

    #[test]
    fn test_missing_or_zero_rate_gives_zero() {
        let none = MarketRates::default();
        assert_eq!(compute_liability(dec!(10), AssetKind::Gold, &none), Decimal::ZERO);
        assert_eq!(compute_liability(dec!(4), AssetKind::Fitr, &none), Decimal::ZERO);

        let zero = MarketRates::new(Some(dec!(0)), None, None);
        assert_eq!(compute_liability(dec!(10), AssetKind::Gold, &zero), Decimal::ZERO);
    }

    #[test]
    fn test_monetary_kinds_ignore_rates() {
        for kind in [AssetKind::Cash, AssetKind::Stocks, AssetKind::Business] {
            assert_eq!(
                compute_liability(dec!(1234.56), kind, &MarketRates::default()),
                compute_liability(dec!(1234.56), kind, &rates()),
            );
        }
    }

    #[test]
    fn test_midpoint_rounds_up() {
        // 0.5 × 0.025 = 0.0125
        assert_eq!(compute_liability(dec!(0.5), AssetKind::Cash, &rates()), dec!(0.01));
        // 0.2 × 0.025 = 0.005
        assert_eq!(compute_liability(dec!(0.2), AssetKind::Cash, &rates()), dec!(0.01));
    }

    #[test]
    fn test_overflowing_product_gives_zero() {
        assert_eq!(compute_liability(Decimal::MAX, AssetKind::Gold, &rates()), Decimal::ZERO);
        assert_eq!(compute_liability(Decimal::MAX, AssetKind::Fitr, &rates()), Decimal::ZERO);

        let huge_rate = MarketRates::new(Some(Decimal::MAX), None, None);
        assert_eq!(compute_liability(dec!(10), AssetKind::Gold, &huge_rate), Decimal::ZERO);
    }

    #[test]
    fn test_largest_cash_amount_still_computes() {
        assert!(compute_liability(Decimal::MAX, AssetKind::Cash, &rates()) > Decimal::ZERO);
    }

    #[test]
    fn test_formula_table_markets() {
        assert_eq!(LiabilityFormula::for_kind(AssetKind::Cash).market(), None);
        assert_eq!(LiabilityFormula::for_kind(AssetKind::Gold).market(), Some(MarketRate::Gold));
        assert_eq!(LiabilityFormula::for_kind(AssetKind::Fitr).market(), Some(MarketRate::Fitr));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn flat_kinds_are_round2_of_quantity_times_rate(
            cents in 0i64..10_000_000_000i64,
            kind_index in 0usize..3usize
        ) {
            let kind = [AssetKind::Cash, AssetKind::Stocks, AssetKind::Business][kind_index];
            let quantity = Decimal::new(cents, 2);
            let expected = round2(quantity * Decimal::new(25, 3));
            prop_assert_eq!(compute_liability(quantity, kind, &MarketRates::default()), expected);
        }

        #[test]
        fn gold_is_round2_of_grams_times_price_times_rate(
            grams in 0i64..100_000i64,
            price in 1i64..100_000i64
        ) {
            let quantity = Decimal::from(grams);
            let rates = MarketRates::new(Some(Decimal::from(price)), None, None);
            let expected = round2(quantity * Decimal::from(price) * Decimal::new(25, 3));
            prop_assert_eq!(compute_liability(quantity, AssetKind::Gold, &rates), expected);
        }
    }
}
