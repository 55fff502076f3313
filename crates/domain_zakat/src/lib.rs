//! Zakat Accrual Domain
//!
//! This crate computes zakat owed on a personal ledger of assets and tracks
//! the lunar-year (hawl) periods that have elapsed on each of them.
//!
//! # Engine
//!
//! The pure calculation core lives in four modules and performs no I/O:
//!
//! - [`period`]: the 354-day schedule of accrual periods for an entry
//! - [`liability`]: the per-kind formula table and `compute_liability`
//! - [`aggregate`]: totals and per-kind breakdown over unpaid periods
//! - [`asset`]: entries and `toggle_paid`
//!
//! Every surface (HTTP handlers, the ledger service, reports) calls into
//! these functions; no formula is repeated elsewhere.
//!
//! # Collaborators
//!
//! - [`ledger::ZakatLedger`] owns the entry collection
//! - [`services::ZakatService`] loads and saves it through [`ports::LedgerStore`]
//! - [`rates::RateBoard`] holds current market rates fed by [`ports::MarketRatePort`]
//! - [`nisab`] and [`reminder`] are advisory and never change the amount due
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use core_kernel::Currency;
//! use domain_zakat::{aggregate_liability, AssetEntry, AssetKind, MarketRates};
//! use rust_decimal_macros::dec;
//!
//! let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//! let valued = NaiveDate::from_ymd_opt(2023, 11, 28).unwrap();
//! let cash = AssetEntry::new(AssetKind::Cash, None, dec!(10000), Some(valued), today);
//!
//! let result = aggregate_liability(&[cash], &MarketRates::default(), Currency::EGP);
//! assert_eq!(result.total, dec!(250.00));
//! ```

use core_kernel::Rate;
use rust_decimal_macros::dec;

pub mod asset;
pub mod period;
pub mod liability;
pub mod aggregate;
pub mod nisab;
pub mod reminder;
pub mod validation;
pub mod ledger;
pub mod services;
pub mod ports;
pub mod rates;
pub mod adapters;
pub mod error;

/// The fixed zakat percentage applied to wealth-based assets
pub const ZAKAT_RATE: Rate = Rate::new(dec!(0.025));

pub use asset::{toggle_paid, AssetEntry, AssetKind};
pub use period::{generate_periods, regenerate_periods, AccrualPeriod, HawlSchedule, MAX_PERIODS};
pub use liability::{compute_liability, round2, LiabilityFormula, MarketRate, MarketRates};
pub use aggregate::{aggregate_liability, BreakdownRow, ZakatResult};
pub use nisab::{assess_eligibility, EligibilityReport, KindEligibility, NisabStandard, NisabStatus};
pub use reminder::{HawlReminder, ReminderStatus};
pub use validation::{EntryDraft, ValidatedEntry, MAX_QUANTITY};
pub use ledger::ZakatLedger;
pub use services::{LoadReport, SummaryReport, ZakatService};
pub use ports::{LedgerStore, LoadedLedger, MarketRatePort};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockLedgerStore;
pub use rates::{RateBoard, RateSnapshot, RefreshOutcome};
pub use adapters::{StaticQuoteAdapter, StaticQuoteConfig};
pub use error::ZakatError;
