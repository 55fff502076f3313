//! Entry input validation
//!
//! Drafts arrive from a form or an API body with every field optional. They
//! are checked before reaching the engine; the first failure is reported as
//! a message suitable for showing to the user.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::asset::AssetKind;
use crate::error::ZakatError;

pub const MSG_INVALID_VALUE: &str = "Enter a valid value";
pub const MSG_SELECT_KIND: &str = "Select zakat type";
pub const MSG_STOCK_NAME: &str = "Enter stock name";
pub const MSG_VALUE_DATE: &str = "Enter value date";

/// Largest quantity accepted for any kind
pub const MAX_QUANTITY: Decimal = dec!(1000000000000000);

/// Unvalidated entry input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub kind: Option<AssetKind>,
    pub label: Option<String>,
    pub quantity: Option<Decimal>,
    pub valuation_date: Option<NaiveDate>,
    /// Gold price per gram to snapshot on the entry
    pub gold_rate: Option<Decimal>,
    /// Fitr value per person to snapshot on the entry
    pub fitr_rate: Option<Decimal>,
}

/// Entry input that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEntry {
    pub kind: AssetKind,
    pub label: Option<String>,
    pub quantity: Decimal,
    pub valuation_date: NaiveDate,
    pub gold_rate: Option<Decimal>,
    pub fitr_rate: Option<Decimal>,
}

impl EntryDraft {
    pub fn new(kind: AssetKind, quantity: Decimal, valuation_date: NaiveDate) -> Self {
        Self {
            kind: Some(kind),
            quantity: Some(quantity),
            valuation_date: Some(valuation_date),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Checks the draft
    ///
    /// Labels are trimmed and blank labels dropped. Rate snapshots are kept
    /// only for the kind that uses them.
    pub fn validate(&self) -> Result<ValidatedEntry, ZakatError> {
        let quantity = self
            .quantity
            .filter(|q| *q > Decimal::ZERO && *q <= MAX_QUANTITY)
            .ok_or_else(|| ZakatError::validation(MSG_INVALID_VALUE))?;

        let kind = self
            .kind
            .ok_or_else(|| ZakatError::validation(MSG_SELECT_KIND))?;

        let label = self
            .label
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string);
        if kind.requires_label() && label.is_none() {
            return Err(ZakatError::validation(MSG_STOCK_NAME));
        }

        let valuation_date = self
            .valuation_date
            .ok_or_else(|| ZakatError::validation(MSG_VALUE_DATE))?;

        let positive = |rate: Option<Decimal>| rate.filter(|r| *r > Decimal::ZERO);

        Ok(ValidatedEntry {
            kind,
            label,
            quantity,
            valuation_date,
            gold_rate: if kind == AssetKind::Gold { positive(self.gold_rate) } else { None },
            fitr_rate: if kind == AssetKind::Fitr { positive(self.fitr_rate) } else { None },
        })
    }
}
