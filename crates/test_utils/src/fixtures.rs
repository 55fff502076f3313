//! Pre-built Test Fixtures
//!
//! Provides ready-to-use dates, market rates and stored payloads. Dates are
//! pinned so that period schedules in tests are predictable.

use chrono::{Days, NaiveDate};
use rust_decimal_macros::dec;

use core_kernel::FixedClock;
use domain_zakat::MarketRates;

/// Fixture for dates
pub struct DateFixtures;

impl DateFixtures {
    /// The "today" every fixture is relative to
    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    /// A date `days` before today
    pub fn days_ago(days: u64) -> NaiveDate {
        Self::today() - Days::new(days)
    }

    /// One full hawl plus a few weeks ago: exactly one period has elapsed
    pub fn one_hawl_ago() -> NaiveDate {
        Self::days_ago(400)
    }

    /// Long enough ago that eight periods have elapsed
    pub fn eight_hawls_ago() -> NaiveDate {
        Self::days_ago(3000)
    }

    /// A clock pinned to [`DateFixtures::today`]
    pub fn clock() -> FixedClock {
        FixedClock(Self::today())
    }
}

/// Fixture for market rates
pub struct RateFixtures;

impl RateFixtures {
    /// Gold, silver and fitr all set
    pub fn standard() -> MarketRates {
        MarketRates::new(Some(dec!(3500)), Some(dec!(45)), Some(dec!(60)))
    }

    /// Only the rates the mock quote feed serves
    pub fn feed() -> MarketRates {
        MarketRates::new(Some(dec!(3500)), None, Some(dec!(60)))
    }

    /// No rates at all
    pub fn none() -> MarketRates {
        MarketRates::default()
    }
}

/// Stored payloads as each schema version wrote them
pub struct PayloadFixtures;

impl PayloadFixtures {
    /// Flat calculator rows (v1)
    pub fn v1_rows() -> &'static str {
        r#"[
            {"id": 1716000000000, "type": "cash", "value": 10000},
            {"id": "1716000000001", "type": "gold", "value": 10, "goldPrice": 3400, "paid": true},
            {"id": "1716000000002", "type": "fitr", "value": 4, "fitrValue": 55}
        ]"#
    }

    /// Entries with missed periods (v2)
    pub fn v2_entries() -> &'static str {
        r#"[
            {"id": "1716000000000", "type": "cash", "name": "", "value": 10000,
             "valueDate": "2023-06-01",
             "missedPeriods": [
                {"due": "2024-05-20", "paid": true, "value": 10000},
                {"due": "2025-05-09", "paid": false, "value": 10000}
             ]},
            {"id": "1716000000003", "type": "stocks", "name": "ACME", "value": 2000,
             "valueDate": "2024-05-01",
             "missedPeriods": [
                {"due": "2025-04-20", "paid": false, "value": 2000}
             ]}
        ]"#
    }

    /// Not JSON at all
    pub fn garbage() -> &'static str {
        "{\"schemaVersion\": 3, \"entries\": [trunc"
    }
}
