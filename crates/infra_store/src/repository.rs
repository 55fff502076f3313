//! Ledger repository
//!
//! Implements the domain's [`LedgerStore`] port over a [`KeyValueStore`].
//!
//! # Loading
//!
//! The newest key present wins: `zakatLedger`, then `zakatEntries`, then
//! `zakatRows`. Older shapes are migrated forward one version at a time.
//! Unreadable data yields an empty ledger with `discarded_corrupt` set, and
//! the unreadable text is copied to a `.corrupt` key before anything can
//! overwrite it.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use core_kernel::temporal::parse_iso_date;
use core_kernel::{Clock, DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_zakat::{AssetEntry, LedgerStore, LoadedLedger, ZakatResult};

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use crate::migrations::{envelope, migrate_v1_to_v2, migrate_v2_to_v3};
use crate::schema::{keys, V1Row, V2Entry, V3Envelope, VersionProbe, CURRENT_SCHEMA_VERSION};

/// Key-value backed implementation of the LedgerStore port
#[derive(Clone)]
pub struct EntryRepository {
    kv: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for EntryRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryRepository")
            .field("kv", &self.kv)
            .finish_non_exhaustive()
    }
}

impl EntryRepository {
    /// Creates a repository
    ///
    /// # Arguments
    ///
    /// * `kv` - The underlying store
    /// * `clock` - Supplies "today" when migrating records without dates
    pub fn new(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { kv, clock }
    }

    async fn quarantine(&self, key: &str, raw: &str) {
        let backup = format!("{key}.corrupt");
        if let Err(e) = self.kv.put(&backup, raw).await {
            warn!(key, error = %e, "Could not back up unreadable data");
        }
    }

    fn load_current(&self, raw: &str) -> Result<Vec<AssetEntry>, StoreError> {
        let probe: VersionProbe = serde_json::from_str(raw)?;
        if probe.schema_version != CURRENT_SCHEMA_VERSION {
            return Err(StoreError::UnsupportedSchema(probe.schema_version));
        }
        let envelope: V3Envelope = serde_json::from_str(raw)?;
        Ok(envelope.into_entries())
    }

    async fn load_legacy(&self) -> Result<Option<LoadedLedger>, StoreError> {
        let today = self.clock.today();

        let (v2_entries, dropped, version, key) = match self.kv.get(keys::ENTRIES_V2).await? {
            Some(raw) => {
                let parsed = parse_records::<V2Entry>(&raw)?;
                (parsed.records, parsed.dropped, 2, keys::ENTRIES_V2)
            }
            None => match self.kv.get(keys::ROWS_V1).await? {
                Some(raw) => {
                    let parsed = parse_records::<V1Row>(&raw)?;
                    (
                        migrate_v1_to_v2(parsed.records, today),
                        parsed.dropped,
                        1,
                        keys::ROWS_V1,
                    )
                }
                None => return Ok(None),
            },
        };

        let migrated = migrate_v2_to_v3(v2_entries);
        let dropped = dropped + migrated.dropped;
        info!(
            from_version = version,
            key,
            entries = migrated.records.len(),
            dropped,
            "Migrated legacy ledger"
        );

        Ok(Some(LoadedLedger {
            entries: envelope(migrated.records).into_entries(),
            migrated_from: Some(version),
            discarded_corrupt: dropped > 0,
        }))
    }

    fn corrupt() -> LoadedLedger {
        LoadedLedger {
            discarded_corrupt: true,
            ..Default::default()
        }
    }
}

/// Parses a JSON array record by record, counting records that fail
fn parse_records<T: DeserializeOwned>(raw: &str) -> Result<crate::migrations::Migrated<T>, StoreError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(raw)?;
    let total = values.len();
    let records: Vec<T> = values
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();
    let dropped = total - records.len();
    Ok(crate::migrations::Migrated { records, dropped })
}

impl DomainPort for EntryRepository {}

#[async_trait]
impl HealthCheckable for EntryRepository {
    async fn health_check(&self) -> HealthCheckResult {
        let started = Instant::now();
        match self.kv.get(keys::LEDGER).await {
            Ok(_) => HealthCheckResult::healthy(self.kv.describe(), started.elapsed().as_millis() as u64),
            Err(e) => HealthCheckResult::unhealthy(self.kv.describe(), e.to_string()),
        }
    }
}

#[async_trait]
impl LedgerStore for EntryRepository {
    #[instrument(skip(self))]
    async fn load_entries(&self) -> Result<LoadedLedger, PortError> {
        let raw = match self.kv.get(keys::LEDGER).await {
            Ok(raw) => raw,
            Err(e) if e.is_data_error() => None,
            Err(e) => return Err(e.into()),
        };

        if let Some(raw) = raw {
            return match self.load_current(&raw) {
                Ok(entries) => {
                    debug!(entries = entries.len(), "Loaded ledger");
                    Ok(LoadedLedger::current(entries))
                }
                Err(e) => {
                    warn!(key = keys::LEDGER, error = %e, "Unreadable ledger, starting empty");
                    self.quarantine(keys::LEDGER, &raw).await;
                    Ok(Self::corrupt())
                }
            };
        }

        match self.load_legacy().await {
            Ok(Some(loaded)) => Ok(loaded),
            Ok(None) => Ok(LoadedLedger::default()),
            Err(e) if e.is_data_error() => {
                warn!(error = %e, "Unreadable legacy ledger, starting empty");
                Ok(Self::corrupt())
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, entries), fields(count = entries.len()))]
    async fn save_entries(&self, entries: &[AssetEntry]) -> Result<(), PortError> {
        let body = serde_json::to_string(&V3Envelope::from_entries(entries))
            .map_err(StoreError::from)?;
        self.kv.put(keys::LEDGER, &body).await?;
        Ok(())
    }

    async fn load_reminder(&self) -> Result<Option<NaiveDate>, PortError> {
        let raw = self.kv.get(keys::REMINDER).await?;
        Ok(raw.and_then(|text| {
            // Older clients stored the date JSON-quoted
            let text = text.trim().trim_matches('"');
            if text.is_empty() {
                return None;
            }
            match parse_iso_date(text) {
                Ok(date) => Some(date),
                Err(e) => {
                    warn!(error = %e, "Unreadable reminder date");
                    None
                }
            }
        }))
    }

    async fn save_reminder(&self, start_date: NaiveDate) -> Result<(), PortError> {
        self.kv
            .put(keys::REMINDER, &start_date.format("%Y-%m-%d").to_string())
            .await?;
        Ok(())
    }

    async fn load_cached_result(&self) -> Result<Option<ZakatResult>, PortError> {
        let raw = self.kv.get(keys::RESULT).await?;
        Ok(raw.and_then(|text| match serde_json::from_str(&text) {
            Ok(result) => Some(result),
            Err(e) => {
                debug!(error = %e, "Ignoring unreadable cached summary");
                None
            }
        }))
    }

    async fn save_cached_result(&self, result: &ZakatResult) -> Result<(), PortError> {
        let body = serde_json::to_string(result).map_err(StoreError::from)?;
        self.kv.put(keys::RESULT, &body).await?;
        Ok(())
    }
}
