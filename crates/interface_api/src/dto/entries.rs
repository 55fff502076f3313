//! Entry DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_zakat::{AccrualPeriod, AssetEntry, AssetKind, EntryDraft};

/// Body for creating or replacing an entry
///
/// Every field is optional so that a missing field is reported with the
/// same message a form would show, rather than as a decoding failure.
#[derive(Debug, Default, Deserialize)]
pub struct EntryRequest {
    pub kind: Option<AssetKind>,
    pub label: Option<String>,
    pub quantity: Option<Decimal>,
    pub valuation_date: Option<NaiveDate>,
    pub gold_rate: Option<Decimal>,
    pub fitr_rate: Option<Decimal>,
}

impl From<EntryRequest> for EntryDraft {
    fn from(request: EntryRequest) -> Self {
        EntryDraft {
            kind: request.kind,
            label: request.label,
            quantity: request.quantity,
            valuation_date: request.valuation_date,
            gold_rate: request.gold_rate,
            fitr_rate: request.fitr_rate,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PeriodResponse {
    pub due_date: NaiveDate,
    pub paid: bool,
    pub principal: Decimal,
}

impl From<&AccrualPeriod> for PeriodResponse {
    fn from(period: &AccrualPeriod) -> Self {
        Self {
            due_date: period.due_date,
            paid: period.paid,
            principal: period.principal,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub id: Uuid,
    pub kind: AssetKind,
    pub label: String,
    pub quantity: Decimal,
    pub valuation_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gold_rate_at_entry: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fitr_rate_at_entry: Option<Decimal>,
    pub unpaid_periods: usize,
    pub periods: Vec<PeriodResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&AssetEntry> for EntryResponse {
    fn from(entry: &AssetEntry) -> Self {
        Self {
            id: *entry.id.as_uuid(),
            kind: entry.kind,
            label: entry.display_label().to_string(),
            quantity: entry.quantity,
            valuation_date: entry.valuation_date,
            gold_rate_at_entry: entry.gold_rate_at_entry,
            fitr_rate_at_entry: entry.fitr_rate_at_entry,
            unpaid_periods: entry.unpaid_periods().count(),
            periods: entry.missed_periods.iter().map(PeriodResponse::from).collect(),
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}
