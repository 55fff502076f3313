//! Schema migrations
//!
//! One function per historical version, each lifting records to the next
//! version. Records that cannot be lifted are dropped and counted; the rest
//! of the collection still migrates.

use chrono::{Days, NaiveDate, Utc};
use tracing::warn;

use core_kernel::temporal::parse_iso_date;
use core_kernel::{EntryId, LUNAR_YEAR_DAYS};
use domain_zakat::{generate_periods, AssetKind, MAX_PERIODS};

use crate::schema::{V1Row, V2Entry, V2Period, V3Entry, V3Envelope, V3Period, CURRENT_SCHEMA_VERSION};

/// Records that migrated and how many were dropped
#[derive(Debug, Clone, PartialEq)]
pub struct Migrated<T> {
    pub records: Vec<T>,
    pub dropped: usize,
}

/// Lifts version 1 rows to version 2 entries
///
/// A row has no valuation date. It is taken to be one hawl before the row's
/// `dueDate`, or one hawl before `today` when absent, so that the row's due
/// date becomes the first period. A row marked paid marks that period paid;
/// a row not yet due has no period to mark, so its flag is dropped and
/// logged. Rate snapshots on the row are kept.
pub fn migrate_v1_to_v2(rows: Vec<V1Row>, today: NaiveDate) -> Vec<V2Entry> {
    rows.into_iter()
        .map(|row| {
            let due = row
                .due_date
                .as_deref()
                .and_then(|d| parse_iso_date(d).ok())
                .unwrap_or(today);
            let value_date = due
                .checked_sub_days(Days::new(LUNAR_YEAR_DAYS))
                .unwrap_or(due);

            let paid = row.paid.unwrap_or(false);
            let missed_periods: Vec<V2Period> =
                generate_periods(Some(value_date), row.value, today, MAX_PERIODS)
                    .into_iter()
                    .enumerate()
                    .map(|(i, p)| V2Period {
                        due: p.due_date.format("%Y-%m-%d").to_string(),
                        paid: i == 0 && paid,
                        value: p.principal,
                    })
                    .collect();
            if paid && missed_periods.is_empty() {
                warn!(
                    legacy_id = %row.id.as_text(),
                    due = %due,
                    "Dropping paid flag of row not yet due"
                );
            }

            V2Entry {
                id: row.id,
                kind: row.kind,
                name: row.name,
                value: row.value,
                value_date: value_date.format("%Y-%m-%d").to_string(),
                missed_periods,
                gold_price: row.gold_price,
                fitr_value: row.fitr_value,
            }
        })
        .collect()
}

/// Lifts version 2 entries to version 3
///
/// Legacy string ids map to stable UUIDs. Entries with an unknown kind are
/// dropped; periods with an unreadable due date are dropped from their
/// entry. An unreadable valuation date leaves the entry without one.
pub fn migrate_v2_to_v3(entries: Vec<V2Entry>) -> Migrated<V3Entry> {
    let now = Utc::now();
    let mut dropped = 0;
    let mut records = Vec::with_capacity(entries.len());

    for entry in entries {
        let legacy_id = entry.id.as_text();
        let kind = match entry.kind.parse::<AssetKind>() {
            Ok(kind) => kind,
            Err(_) => {
                warn!(legacy_id = %legacy_id, kind = %entry.kind, "Dropping entry with unknown kind");
                dropped += 1;
                continue;
            }
        };

        let valuation_date = parse_iso_date(&entry.value_date).ok();
        if valuation_date.is_none() && !entry.value_date.is_empty() {
            warn!(legacy_id = %legacy_id, value_date = %entry.value_date, "Unreadable valuation date");
        }

        let mut missed_periods: Vec<V3Period> = entry
            .missed_periods
            .into_iter()
            .filter_map(|p| match parse_iso_date(&p.due) {
                Ok(due_date) => Some(V3Period {
                    due_date,
                    paid: p.paid,
                    principal: p.value,
                }),
                Err(_) => {
                    warn!(legacy_id = %legacy_id, due = %p.due, "Dropping period with unreadable due date");
                    None
                }
            })
            .collect();
        missed_periods.sort_by_key(|p| p.due_date);
        missed_periods.dedup_by_key(|p| p.due_date);

        let label = entry
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        records.push(V3Entry {
            id: *EntryId::from_legacy(&legacy_id).as_uuid(),
            kind,
            label,
            quantity: entry.value,
            valuation_date,
            gold_rate_at_entry: entry.gold_price.filter(|_| kind == AssetKind::Gold),
            fitr_rate_at_entry: entry.fitr_value.filter(|_| kind == AssetKind::Fitr),
            missed_periods,
            created_at: now,
            updated_at: now,
        });
    }

    Migrated { records, dropped }
}

/// Wraps version 3 entries in the current envelope
pub fn envelope(entries: Vec<V3Entry>) -> V3Envelope {
    V3Envelope {
        schema_version: CURRENT_SCHEMA_VERSION,
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::LegacyId;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(kind: &str) -> V1Row {
        V1Row {
            id: LegacyId::Text("1700000000000".to_string()),
            kind: kind.to_string(),
            value: dec!(10),
            name: None,
            gold_price: None,
            fitr_value: None,
            due_date: None,
            paid: None,
        }
    }

    #[test]
    fn test_v1_row_without_due_date_is_due_today() {
        let today = date(2025, 1, 1);
        let v2 = migrate_v1_to_v2(vec![row("cash")], today);
        assert_eq!(v2[0].missed_periods.len(), 1);
        assert_eq!(v2[0].missed_periods[0].due, "2025-01-01");
        assert!(!v2[0].missed_periods[0].paid);
    }

    #[test]
    fn test_v1_paid_row_marks_first_period() {
        let today = date(2025, 1, 1);
        let mut paid = row("gold");
        paid.paid = Some(true);
        paid.due_date = Some("2024-12-01T00:00:00.000Z".to_string());
        paid.gold_price = Some(dec!(3400));

        let v2 = migrate_v1_to_v2(vec![paid], today);
        assert_eq!(v2[0].missed_periods[0].due, "2024-12-01");
        assert!(v2[0].missed_periods[0].paid);
        assert_eq!(v2[0].gold_price, Some(dec!(3400)));
    }

    #[test]
    fn test_v1_paid_row_not_yet_due_keeps_entry_without_periods() {
        let today = date(2025, 1, 1);
        let mut future = row("cash");
        future.paid = Some(true);
        future.due_date = Some("2025-03-01".to_string());

        let v2 = migrate_v1_to_v2(vec![future], today);
        assert_eq!(v2.len(), 1);
        assert!(v2[0].missed_periods.is_empty());
        assert_eq!(v2[0].value_date, "2024-03-12");

        let v3 = migrate_v2_to_v3(v2);
        assert_eq!(v3.dropped, 0);
        assert!(v3.records[0].missed_periods.is_empty());
    }

    #[test]
    fn test_v2_unknown_kind_is_dropped() {
        let v2 = migrate_v1_to_v2(vec![row("cash"), row("property")], date(2025, 1, 1));
        let v3 = migrate_v2_to_v3(v2);
        assert_eq!(v3.records.len(), 1);
        assert_eq!(v3.dropped, 1);
    }

    #[test]
    fn test_v2_ids_map_stably() {
        let a = migrate_v2_to_v3(migrate_v1_to_v2(vec![row("cash")], date(2025, 1, 1)));
        let b = migrate_v2_to_v3(migrate_v1_to_v2(vec![row("cash")], date(2025, 1, 1)));
        assert_eq!(a.records[0].id, b.records[0].id);
    }

    #[test]
    fn test_snapshot_kept_only_for_matching_kind() {
        let mut cash = row("cash");
        cash.gold_price = Some(dec!(3500));
        let v3 = migrate_v2_to_v3(migrate_v1_to_v2(vec![cash], date(2025, 1, 1)));
        assert_eq!(v3.records[0].gold_rate_at_entry, None);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::schema::LegacyId;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    proptest! {
        #[test]
        fn v1_rows_always_migrate_with_one_period_due(
            cents in 1i64..10_000_000i64,
            days_back in 0u64..3_000u64,
            paid in any::<bool>(),
            kind in prop::sample::select(vec!["cash", "gold", "silver", "stocks", "business", "fitr"]),
        ) {
            let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
            let due = today - Days::new(days_back);
            let row = V1Row {
                id: LegacyId::Text("1".to_string()),
                kind: kind.to_string(),
                value: Decimal::new(cents, 2),
                name: None,
                gold_price: None,
                fitr_value: None,
                due_date: Some(due.format("%Y-%m-%d").to_string()),
                paid: Some(paid),
            };

            let v3 = migrate_v2_to_v3(migrate_v1_to_v2(vec![row], today));
            prop_assert_eq!(v3.dropped, 0);
            let entry = &v3.records[0];
            prop_assert_eq!(entry.missed_periods[0].due_date, due);
            prop_assert_eq!(entry.missed_periods[0].paid, paid);
            prop_assert!(entry.missed_periods.iter().skip(1).all(|p| !p.paid));
            prop_assert!(entry.missed_periods.len() <= MAX_PERIODS);
        }
    }
}
