//! Persisted shapes
//!
//! Each historical layout of the ledger has its own record types here. Field
//! names follow what was written at the time, so older data deserializes
//! unchanged. Only version 3 is ever written.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::EntryId;
use domain_zakat::{AccrualPeriod, AssetEntry, AssetKind};

/// Schema version written by this build
pub const CURRENT_SCHEMA_VERSION: u32 = 3;

/// Storage keys
pub mod keys {
    /// Versioned ledger envelope (v3)
    pub const LEDGER: &str = "zakatLedger";
    /// Entries with missed periods (v2)
    pub const ENTRIES_V2: &str = "zakatEntries";
    /// Flat calculator rows (v1)
    pub const ROWS_V1: &str = "zakatRows";
    /// Last computed summary
    pub const RESULT: &str = "zakatResult";
    /// Reminder hawl start date
    pub const REMINDER: &str = "hijri";
}

/// Legacy ids were strings or bare numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegacyId {
    Text(String),
    Number(serde_json::Number),
}

impl LegacyId {
    pub fn as_text(&self) -> String {
        match self {
            LegacyId::Text(s) => s.clone(),
            LegacyId::Number(n) => n.to_string(),
        }
    }
}

// ============================================================================
// Version 1
// ============================================================================

/// A calculator row: a quantity with no valuation date and no periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V1Row {
    pub id: LegacyId,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Decimal,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub gold_price: Option<Decimal>,
    #[serde(default)]
    pub fitr_value: Option<Decimal>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub paid: Option<bool>,
}

// ============================================================================
// Version 2
// ============================================================================

/// A period as written by version 2
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V2Period {
    pub due: String,
    #[serde(default)]
    pub paid: bool,
    pub value: Decimal,
}

/// An entry with its missed periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V2Entry {
    pub id: LegacyId,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    pub value: Decimal,
    #[serde(default)]
    pub value_date: String,
    #[serde(default)]
    pub missed_periods: Vec<V2Period>,
    /// Carried over from version 1 rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gold_price: Option<Decimal>,
    /// Carried over from version 1 rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitr_value: Option<Decimal>,
}

// ============================================================================
// Version 3
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V3Period {
    pub due_date: NaiveDate,
    pub paid: bool,
    pub principal: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V3Entry {
    pub id: Uuid,
    pub kind: AssetKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub quantity: Decimal,
    #[serde(default)]
    pub valuation_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gold_rate_at_entry: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitr_rate_at_entry: Option<Decimal>,
    #[serde(default)]
    pub missed_periods: Vec<V3Period>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The current envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V3Envelope {
    pub schema_version: u32,
    pub entries: Vec<V3Entry>,
}

/// Just enough of an envelope to read its version
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionProbe {
    pub schema_version: u32,
}

impl From<&AssetEntry> for V3Entry {
    fn from(entry: &AssetEntry) -> Self {
        Self {
            id: *entry.id.as_uuid(),
            kind: entry.kind,
            label: entry.label.clone(),
            quantity: entry.quantity,
            valuation_date: entry.valuation_date,
            gold_rate_at_entry: entry.gold_rate_at_entry,
            fitr_rate_at_entry: entry.fitr_rate_at_entry,
            missed_periods: entry
                .missed_periods
                .iter()
                .map(|p| V3Period {
                    due_date: p.due_date,
                    paid: p.paid,
                    principal: p.principal,
                })
                .collect(),
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

impl From<V3Entry> for AssetEntry {
    fn from(stored: V3Entry) -> Self {
        Self {
            id: EntryId::from_uuid(stored.id),
            kind: stored.kind,
            label: stored.label,
            quantity: stored.quantity,
            valuation_date: stored.valuation_date,
            gold_rate_at_entry: stored.gold_rate_at_entry,
            fitr_rate_at_entry: stored.fitr_rate_at_entry,
            missed_periods: stored
                .missed_periods
                .into_iter()
                .map(|p| AccrualPeriod {
                    due_date: p.due_date,
                    paid: p.paid,
                    principal: p.principal,
                })
                .collect(),
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }
}

impl V3Envelope {
    pub fn from_entries(entries: &[AssetEntry]) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            entries: entries.iter().map(V3Entry::from).collect(),
        }
    }

    pub fn into_entries(self) -> Vec<AssetEntry> {
        self.entries.into_iter().map(AssetEntry::from).collect()
    }
}
