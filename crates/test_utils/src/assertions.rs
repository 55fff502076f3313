//! Custom Test Assertions
//!
//! Provides assertion helpers for periods and summaries that give more
//! meaningful failure messages than plain `assert_eq!`.

use rust_decimal::Decimal;

use core_kernel::LUNAR_YEAR_DAYS;
use domain_zakat::{AssetEntry, AssetKind, ZakatResult, MAX_PERIODS};

/// Asserts the structural invariants of an entry's periods
///
/// # Panics
///
/// Panics if there are more than the maximum number of periods, or if due
/// dates are not exactly one hawl apart starting one hawl after valuation
pub fn assert_periods_well_formed(entry: &AssetEntry) {
    let periods = &entry.missed_periods;
    assert!(
        periods.len() <= MAX_PERIODS,
        "Entry {} has {} periods, more than the maximum of {}",
        entry.id,
        periods.len(),
        MAX_PERIODS
    );

    if let (Some(first), Some(valued)) = (periods.first(), entry.valuation_date) {
        assert_eq!(
            (first.due_date - valued).num_days(),
            LUNAR_YEAR_DAYS as i64,
            "First period of {} is not one hawl after valuation",
            entry.id
        );
    }

    for pair in periods.windows(2) {
        assert_eq!(
            (pair[1].due_date - pair[0].due_date).num_days(),
            LUNAR_YEAR_DAYS as i64,
            "Periods {} and {} of {} are not one hawl apart",
            pair[0].due_date,
            pair[1].due_date,
            entry.id
        );
    }
}

/// Asserts that a summary's breakdown is in canonical kind order
pub fn assert_breakdown_canonical(result: &ZakatResult) {
    let kinds: Vec<AssetKind> = result.breakdown.iter().map(|row| row.kind).collect();
    let mut sorted = kinds.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(kinds, sorted, "Breakdown is not in canonical order without repeats");
}

/// Asserts that a summary's total equals the sum of its breakdown rows
pub fn assert_total_matches_breakdown(result: &ZakatResult) {
    let sum: Decimal = result.breakdown.iter().map(|row| row.amount).sum();
    assert_eq!(
        sum, result.total,
        "Breakdown sums to {} but total is {}",
        sum, result.total
    );
}

/// Asserts that a decimal value is approximately equal to another
pub fn assert_decimal_approx_eq(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "Decimals differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual,
        expected,
        diff,
        tolerance
    );
}

/// Asserts that a result is Ok and returns the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Asserts that a result is Err and returns the error
#[macro_export]
macro_rules! assert_err {
    ($result:expr) => {
        match $result {
            Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
            Err(e) => e,
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::AssetEntryBuilder;
    use crate::fixtures::{DateFixtures, RateFixtures};
    use core_kernel::Currency;
    use domain_zakat::aggregate_liability;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fixture_entries_are_well_formed() {
        let entry = AssetEntryBuilder::new()
            .valued_on(DateFixtures::eight_hawls_ago())
            .build();
        assert_eq!(entry.missed_periods.len(), 8);
        assert_periods_well_formed(&entry);
    }

    #[test]
    fn test_summary_assertions_accept_real_summary() {
        let entries = vec![
            AssetEntryBuilder::fitr(dec!(4)).build(),
            AssetEntryBuilder::new().build(),
            AssetEntryBuilder::gold(dec!(10)).build(),
        ];
        let result = aggregate_liability(&entries, &RateFixtures::standard(), Currency::EGP);
        assert_breakdown_canonical(&result);
        assert_total_matches_breakdown(&result);
        assert_decimal_approx_eq(result.total, dec!(1365), dec!(0.01));
    }

    #[test]
    #[should_panic(expected = "not in canonical order")]
    fn test_out_of_order_breakdown_is_caught() {
        let mut result = aggregate_liability(
            &[AssetEntryBuilder::new().build(), AssetEntryBuilder::gold(dec!(1)).build()],
            &RateFixtures::standard(),
            Currency::EGP,
        );
        result.breakdown.reverse();
        assert_breakdown_canonical(&result);
    }
}
