//! Hawl accrual periods
//!
//! A period falls due on each 354-day anniversary of an entry's valuation
//! date. Periods are a pure function of the valuation date, the principal
//! and "now"; only their `paid` flags carry user state, and those survive
//! regeneration by due-date match.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::temporal::lunar_years_after;
use core_kernel::LUNAR_YEAR_DAYS;

/// Upper bound on periods generated for a single entry
pub const MAX_PERIODS: usize = 20;

/// One elapsed hawl on an asset entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualPeriod {
    /// Anniversary on which zakat for this period fell due
    pub due_date: NaiveDate,
    /// Whether the user has marked this period paid
    pub paid: bool,
    /// Quantity the period's liability is computed from
    pub principal: Decimal,
}

impl AccrualPeriod {
    /// Creates an unpaid period
    pub fn unpaid(due_date: NaiveDate, principal: Decimal) -> Self {
        Self {
            due_date,
            paid: false,
            principal,
        }
    }
}

/// Iterator over the hawl anniversaries of a valuation date
///
/// Yields one unpaid period per 354-day step whose due date is on or
/// before `now`, and stops after `max_periods` periods.
#[derive(Debug, Clone)]
pub struct HawlSchedule {
    next_due: Option<NaiveDate>,
    principal: Decimal,
    now: NaiveDate,
    remaining: usize,
}

impl HawlSchedule {
    /// Creates a schedule. It is empty when the valuation date is unset or
    /// the principal is not positive.
    pub fn new(
        valuation_date: Option<NaiveDate>,
        principal: Decimal,
        now: NaiveDate,
        max_periods: usize,
    ) -> Self {
        let next_due = match valuation_date {
            Some(date) if principal > Decimal::ZERO => lunar_years_after(date, 1).ok(),
            _ => None,
        };

        Self {
            next_due,
            principal,
            now,
            remaining: max_periods,
        }
    }
}

impl Iterator for HawlSchedule {
    type Item = AccrualPeriod;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let due = self.next_due?;
        if due > self.now {
            self.next_due = None;
            return None;
        }

        self.next_due = due.checked_add_days(Days::new(LUNAR_YEAR_DAYS));
        self.remaining -= 1;
        Some(AccrualPeriod::unpaid(due, self.principal))
    }
}

/// Generates the accrual periods elapsed between `valuation_date` and `now`
///
/// # Arguments
///
/// * `valuation_date` - Start of the holding period, if known
/// * `principal` - Quantity each period's liability is computed from
/// * `now` - The reference date; periods due after it are not emitted
/// * `max_periods` - Safety cap on the number of periods
///
/// # Returns
///
/// Unpaid periods in strictly increasing due-date order, 354 days apart
pub fn generate_periods(
    valuation_date: Option<NaiveDate>,
    principal: Decimal,
    now: NaiveDate,
    max_periods: usize,
) -> Vec<AccrualPeriod> {
    HawlSchedule::new(valuation_date, principal, now, max_periods).collect()
}

/// Regenerates periods, carrying `paid` flags over from `previous` where the
/// due dates match
pub fn regenerate_periods(
    previous: &[AccrualPeriod],
    valuation_date: Option<NaiveDate>,
    principal: Decimal,
    now: NaiveDate,
) -> Vec<AccrualPeriod> {
    HawlSchedule::new(valuation_date, principal, now, MAX_PERIODS)
        .map(|mut period| {
            period.paid = previous
                .iter()
                .any(|p| p.due_date == period.due_date && p.paid);
            period
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_no_period_before_first_anniversary() {
        let now = date(2025, 1, 1);
        let valued = now - Days::new(353);
        assert!(generate_periods(Some(valued), dec!(100), now, MAX_PERIODS).is_empty());
    }

    #[test]
    fn test_period_on_exact_anniversary() {
        let now = date(2025, 1, 1);
        let valued = now - Days::new(354);
        let periods = generate_periods(Some(valued), dec!(100), now, MAX_PERIODS);
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].due_date, now);
    }

    #[test]
    fn test_unset_date_or_zero_principal_is_empty() {
        let now = date(2025, 1, 1);
        assert!(generate_periods(None, dec!(100), now, MAX_PERIODS).is_empty());
        assert!(generate_periods(Some(date(2020, 1, 1)), dec!(0), now, MAX_PERIODS).is_empty());
    }

    #[test]
    fn test_future_valuation_date_is_empty() {
        let now = date(2025, 1, 1);
        assert!(generate_periods(Some(date(2026, 1, 1)), dec!(5), now, MAX_PERIODS).is_empty());
    }

    #[test]
    fn test_schedule_is_restartable() {
        let now = date(2025, 1, 1);
        let schedule = HawlSchedule::new(Some(date(2020, 1, 1)), dec!(1), now, MAX_PERIODS);
        let first: Vec<_> = schedule.clone().collect();
        let second: Vec<_> = schedule.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_regenerate_keeps_paid_flags_by_due_date() {
        let now = date(2025, 1, 1);
        let valued = now - Days::new(1000);
        let mut periods = generate_periods(Some(valued), dec!(100), now, MAX_PERIODS);
        periods[1].paid = true;

        let regenerated = regenerate_periods(&periods, Some(valued), dec!(250), now);
        assert_eq!(regenerated.len(), 2);
        assert!(!regenerated[0].paid);
        assert!(regenerated[1].paid);
        assert!(regenerated.iter().all(|p| p.principal == dec!(250)));
    }

    #[test]
    fn test_regenerate_drops_flags_when_dates_move() {
        let now = date(2025, 1, 1);
        let valued = now - Days::new(400);
        let mut periods = generate_periods(Some(valued), dec!(100), now, MAX_PERIODS);
        periods[0].paid = true;

        let moved = valued - Days::new(10);
        let regenerated = regenerate_periods(&periods, Some(moved), dec!(100), now);
        assert_eq!(regenerated.len(), 1);
        assert!(!regenerated[0].paid);
    }
}
