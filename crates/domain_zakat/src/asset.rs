//! Asset entries
//!
//! An asset entry is one line of the user's ledger: a quantity of some kind
//! of wealth, the date it was valued, and the hawl periods elapsed since.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::EntryId;

use crate::error::ZakatError;
use crate::liability::MarketRates;
use crate::period::{generate_periods, regenerate_periods, AccrualPeriod, MAX_PERIODS};
use crate::validation::{ValidatedEntry, MSG_SELECT_KIND};

/// Kind of wealth recorded by an entry
///
/// Declaration order is the canonical reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// Cash in hand or at bank, in the reporting currency
    Cash,
    /// Gold, in grams
    Gold,
    /// Silver, in grams
    Silver,
    /// Stocks and shares, at market value
    Stocks,
    /// Business inventory and receivables
    Business,
    /// Zakat al-Fitr, by number of people
    Fitr,
}

impl AssetKind {
    /// All kinds in canonical order
    pub const ALL: [AssetKind; 6] = [
        AssetKind::Cash,
        AssetKind::Gold,
        AssetKind::Silver,
        AssetKind::Stocks,
        AssetKind::Business,
        AssetKind::Fitr,
    ];

    /// Label used in breakdowns
    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::Cash => "Cash",
            AssetKind::Gold => "Gold",
            AssetKind::Silver => "Silver",
            AssetKind::Stocks => "Stocks",
            AssetKind::Business => "Business",
            AssetKind::Fitr => "Fitr",
        }
    }

    /// Persisted code
    pub fn code(&self) -> &'static str {
        match self {
            AssetKind::Cash => "cash",
            AssetKind::Gold => "gold",
            AssetKind::Silver => "silver",
            AssetKind::Stocks => "stocks",
            AssetKind::Business => "business",
            AssetKind::Fitr => "fitr",
        }
    }

    /// Whether the quantity is a weight of precious metal
    pub fn is_metal(&self) -> bool {
        matches!(self, AssetKind::Gold | AssetKind::Silver)
    }

    /// Whether the quantity is an amount of money
    pub fn is_monetary(&self) -> bool {
        matches!(self, AssetKind::Cash | AssetKind::Stocks | AssetKind::Business)
    }

    /// Whether entries of this kind must carry a label
    pub fn requires_label(&self) -> bool {
        matches!(self, AssetKind::Stocks)
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AssetKind {
    type Err = ZakatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(AssetKind::Cash),
            "gold" => Ok(AssetKind::Gold),
            "silver" => Ok(AssetKind::Silver),
            "stocks" => Ok(AssetKind::Stocks),
            "business" => Ok(AssetKind::Business),
            "fitr" => Ok(AssetKind::Fitr),
            _ => Err(ZakatError::validation(MSG_SELECT_KIND)),
        }
    }
}

/// A recorded asset and its elapsed hawl periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetEntry {
    /// Unique identifier, never reused
    pub id: EntryId,
    pub kind: AssetKind,
    /// Free-text name, required for stocks
    pub label: Option<String>,
    /// Currency amount, grams or headcount depending on `kind`
    pub quantity: Decimal,
    /// Date the quantity was established
    pub valuation_date: Option<NaiveDate>,
    /// Gold price per gram when the entry was recorded
    pub gold_rate_at_entry: Option<Decimal>,
    /// Fitr value per person when the entry was recorded
    pub fitr_rate_at_entry: Option<Decimal>,
    /// Elapsed periods in due-date order
    pub missed_periods: Vec<AccrualPeriod>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AssetEntry {
    /// Creates an entry and generates its periods up to `today`
    pub fn new(
        kind: AssetKind,
        label: Option<String>,
        quantity: Decimal,
        valuation_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: EntryId::new(),
            kind,
            label,
            quantity,
            valuation_date,
            gold_rate_at_entry: None,
            fitr_rate_at_entry: None,
            missed_periods: generate_periods(valuation_date, quantity, today, MAX_PERIODS),
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates an entry from validated input
    pub fn from_validated(input: ValidatedEntry, today: NaiveDate) -> Self {
        Self::new(
            input.kind,
            input.label,
            input.quantity,
            Some(input.valuation_date),
            today,
        )
        .with_rate_snapshots(input.gold_rate, input.fitr_rate)
    }

    /// Attaches market rate snapshots
    pub fn with_rate_snapshots(mut self, gold: Option<Decimal>, fitr: Option<Decimal>) -> Self {
        self.gold_rate_at_entry = gold;
        self.fitr_rate_at_entry = fitr;
        self
    }

    /// Label for display, falling back to the kind's label
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or_else(|| self.kind.label())
    }

    /// Rates to use for this entry: snapshots where present, else `current`
    pub fn effective_rates(&self, current: &MarketRates) -> MarketRates {
        MarketRates {
            gold: self.gold_rate_at_entry.or(current.gold),
            silver: current.silver,
            fitr: self.fitr_rate_at_entry.or(current.fitr),
        }
    }

    /// Periods not yet marked paid
    pub fn unpaid_periods(&self) -> impl Iterator<Item = &AccrualPeriod> {
        self.missed_periods.iter().filter(|p| !p.paid)
    }

    /// Flips `paid` on the period due on `due_date`
    ///
    /// # Returns
    ///
    /// `true` if a period matched, `false` if none did (nothing changes)
    pub fn toggle_period(&mut self, due_date: NaiveDate) -> bool {
        match self.missed_periods.iter_mut().find(|p| p.due_date == due_date) {
            Some(period) => {
                period.paid = !period.paid;
                true
            }
            None => false,
        }
    }

    /// Replaces quantity, label and valuation date, then regenerates the
    /// periods keeping paid flags whose due dates still exist
    pub fn revise(&mut self, input: ValidatedEntry, today: NaiveDate) {
        self.kind = input.kind;
        self.label = input.label;
        self.quantity = input.quantity;
        self.valuation_date = Some(input.valuation_date);
        if input.gold_rate.is_some() {
            self.gold_rate_at_entry = input.gold_rate;
        }
        if input.fitr_rate.is_some() {
            self.fitr_rate_at_entry = input.fitr_rate;
        }
        self.missed_periods =
            regenerate_periods(&self.missed_periods, self.valuation_date, self.quantity, today);
        self.touch();
    }

    /// Brings the periods up to `today`
    ///
    /// # Returns
    ///
    /// `true` if the period list changed
    pub fn refresh_periods(&mut self, today: NaiveDate) -> bool {
        let refreshed =
            regenerate_periods(&self.missed_periods, self.valuation_date, self.quantity, today);
        if refreshed == self.missed_periods {
            return false;
        }
        self.missed_periods = refreshed;
        self.touch();
        true
    }

    /// Marks the entry as modified now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Returns `entry` with the period due on `due_date` flipped
///
/// A date that matches no period leaves the entry unchanged.
pub fn toggle_paid(mut entry: AssetEntry, due_date: NaiveDate) -> AssetEntry {
    entry.toggle_period(due_date);
    entry
}
