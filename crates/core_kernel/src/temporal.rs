//! Lunar-year date arithmetic and the ledger clock
//!
//! Zakat falls due once wealth has been held for a hawl, approximated as a
//! lunar year of 354 days. All scheduling in the ledger is done on calendar
//! dates; "today" comes from a [`Clock`] so that computations stay
//! deterministic under test.

use chrono::{Days, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// Length of one hawl in days
pub const LUNAR_YEAR_DAYS: u64 = 354;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Date arithmetic overflowed from {0}")]
    DateOverflow(NaiveDate),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

/// Returns the date `years` lunar years after `date`
pub fn lunar_years_after(date: NaiveDate, years: u64) -> Result<NaiveDate, TemporalError> {
    years
        .checked_mul(LUNAR_YEAR_DAYS)
        .and_then(|days| date.checked_add_days(Days::new(days)))
        .ok_or(TemporalError::DateOverflow(date))
}

/// Signed number of days from `from` to `to`
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Parses an ISO `YYYY-MM-DD` date, accepting a trailing time component
/// (`2024-03-01T00:00:00.000Z`) as written by older clients.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, TemporalError> {
    let trimmed = value.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| TemporalError::InvalidDate(value.to_string()))
}

/// Timezone wrapper for the user's locale
///
/// Wraps chrono_tz::Tz with string serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl FromStr for Timezone {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tz::from_str(s)
            .map(Timezone)
            .map_err(|_| TemporalError::InvalidTimezone(s.to_string()))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// The current calendar date in this timezone
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.0).date_naive()
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::UTC)
    }
}

/// Source of "today" for period generation and reminders
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock evaluated in the user's timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    timezone: Timezone,
}

impl SystemClock {
    pub fn new(timezone: Timezone) -> Self {
        Self { timezone }
    }

    pub fn timezone(&self) -> Timezone {
        self.timezone
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        self.timezone.today()
    }
}

/// A clock pinned to one date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
