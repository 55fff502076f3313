//! Zakat domain services
//!
//! The [`ZakatService`] is the single owner of the ledger for a session. It
//! loads state through a [`LedgerStore`] and writes the ledger back after
//! every mutation. A mutation is applied to a copy of the ledger that only
//! replaces the live one once it has been saved.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use core_kernel::{Clock, Currency, EntryId, HealthCheckResult};

use crate::aggregate::ZakatResult;
use crate::asset::AssetEntry;
use crate::error::ZakatError;
use crate::ledger::ZakatLedger;
use crate::liability::MarketRates;
use crate::nisab::{EligibilityReport, NisabStandard};
use crate::ports::LedgerStore;
use crate::reminder::{HawlReminder, ReminderStatus};
use crate::validation::EntryDraft;

/// Cached and fresh totals differing by more than this are reported
pub const CACHE_DRIFT_TOLERANCE: Decimal = dec!(0.01);

/// What happened while opening the ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Schema version the stored entries were migrated from
    pub migrated_from: Option<u32>,
    /// Stored data was unreadable and an empty ledger was used
    pub discarded_corrupt: bool,
    /// Entries that gained periods since they were last saved
    pub refreshed: usize,
}

/// A freshly computed summary and its drift from the cached one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub result: ZakatResult,
    /// Absolute difference from the previously cached total, when above
    /// tolerance
    pub cache_drift: Option<Decimal>,
}

/// Owner of the ledger, its persistence and the reminder
pub struct ZakatService {
    ledger: ZakatLedger,
    store: Arc<dyn LedgerStore>,
    clock: Arc<dyn Clock>,
    currency: Currency,
    reminder: Option<HawlReminder>,
    cached_result: Option<ZakatResult>,
    load_report: LoadReport,
}

impl ZakatService {
    /// Loads the ledger from `store`
    ///
    /// Unreadable data never prevents opening: the service starts from an
    /// empty ledger and flags the condition in [`LoadReport`]. Periods are
    /// brought up to today and saved if any were added.
    ///
    /// # Errors
    ///
    /// Returns a storage error only if saving refreshed periods fails
    pub async fn open(
        store: Arc<dyn LedgerStore>,
        clock: Arc<dyn Clock>,
        currency: Currency,
    ) -> Result<Self, ZakatError> {
        let loaded = match store.load_entries().await {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(error = %e, "Failed to load ledger, starting empty");
                crate::ports::LoadedLedger {
                    discarded_corrupt: true,
                    ..Default::default()
                }
            }
        };

        let reminder = match store.load_reminder().await {
            Ok(start) => start.and_then(|date| HawlReminder::new(date).ok()),
            Err(e) => {
                warn!(error = %e, "Failed to load reminder");
                None
            }
        };

        let cached_result = store.load_cached_result().await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load cached summary");
            None
        });

        let mut ledger = ZakatLedger::from_entries(loaded.entries);
        let refreshed = ledger.refresh(clock.today());

        let mut service = Self {
            ledger,
            store,
            clock,
            currency,
            reminder,
            cached_result,
            load_report: LoadReport {
                migrated_from: loaded.migrated_from,
                discarded_corrupt: loaded.discarded_corrupt,
                refreshed,
            },
        };

        if refreshed > 0 || loaded.migrated_from.is_some() {
            service.persist(&service.ledger).await?;
        }

        info!(
            entries = service.ledger.len(),
            migrated_from = ?loaded.migrated_from,
            discarded_corrupt = loaded.discarded_corrupt,
            refreshed,
            "Ledger opened"
        );

        Ok(service)
    }

    pub fn ledger(&self) -> &ZakatLedger {
        &self.ledger
    }

    pub fn entries(&self) -> &[AssetEntry] {
        self.ledger.entries()
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn load_report(&self) -> LoadReport {
        self.load_report
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn cached_result(&self) -> Option<&ZakatResult> {
        self.cached_result.as_ref()
    }

    /// Health of the underlying store
    pub async fn store_health(&self) -> HealthCheckResult {
        self.store.health_check().await
    }

    /// Validates and adds an entry
    pub async fn add_entry(&mut self, draft: &EntryDraft) -> Result<AssetEntry, ZakatError> {
        let input = draft.validate()?;
        let today = self.today();
        let mut ledger = self.ledger.clone();
        let entry = ledger.add(input, today).clone();
        self.commit(ledger).await?;
        info!(entry_id = %entry.id, kind = %entry.kind, periods = entry.missed_periods.len(), "Entry added");
        Ok(entry)
    }

    /// Validates and applies an edit
    pub async fn edit_entry(
        &mut self,
        id: EntryId,
        draft: &EntryDraft,
    ) -> Result<AssetEntry, ZakatError> {
        let input = draft.validate()?;
        let today = self.today();
        let mut ledger = self.ledger.clone();
        let entry = ledger.edit(id, input, today)?.clone();
        self.commit(ledger).await?;
        info!(entry_id = %id, "Entry edited");
        Ok(entry)
    }

    pub async fn remove_entry(&mut self, id: EntryId) -> Result<AssetEntry, ZakatError> {
        let mut ledger = self.ledger.clone();
        let removed = ledger.remove(id)?;
        self.commit(ledger).await?;
        info!(entry_id = %id, "Entry removed");
        Ok(removed)
    }

    /// Flips the paid flag on one period; an unknown due date changes nothing
    pub async fn toggle_period(
        &mut self,
        id: EntryId,
        due_date: NaiveDate,
    ) -> Result<AssetEntry, ZakatError> {
        let mut ledger = self.ledger.clone();
        let (entry, toggled) = ledger.toggle_period(id, due_date)?;
        let entry = entry.clone();
        if toggled {
            self.commit(ledger).await?;
            info!(entry_id = %id, due_date = %due_date, "Period toggled");
        } else {
            debug!(entry_id = %id, due_date = %due_date, "No period due on date");
        }
        Ok(entry)
    }

    /// Brings all periods up to today, saving if anything changed
    pub async fn refresh(&mut self) -> Result<usize, ZakatError> {
        let mut ledger = self.ledger.clone();
        let changed = ledger.refresh(self.today());
        if changed > 0 {
            self.commit(ledger).await?;
        }
        Ok(changed)
    }

    /// Computes the summary, compares it with the cached one and caches it
    pub async fn summary(&mut self, rates: &MarketRates) -> Result<SummaryReport, ZakatError> {
        let result = self.ledger.summary(rates, self.currency);

        let cache_drift = self
            .cached_result
            .as_ref()
            .and_then(|cached| match cached.total_money().abs_diff(&result.total_money()) {
                Ok(drift) => Some(drift),
                Err(e) => {
                    debug!(error = %e, "Cached summary is in another currency");
                    None
                }
            })
            .filter(|drift| *drift > CACHE_DRIFT_TOLERANCE);
        if let Some(drift) = cache_drift {
            warn!(drift = %drift, total = %result.total, "Cached summary out of date");
        }

        if self.cached_result.as_ref() != Some(&result) {
            self.store.save_cached_result(&result).await?;
            self.cached_result = Some(result.clone());
        }

        Ok(SummaryReport {
            result,
            cache_drift,
        })
    }

    pub fn eligibility(&self, rates: &MarketRates, standard: NisabStandard) -> EligibilityReport {
        self.ledger.eligibility(rates, standard, self.today())
    }

    pub fn reminder(&self) -> Option<ReminderStatus> {
        self.reminder.map(|r| r.status(self.today()))
    }

    /// Starts the hawl reminder on `start_date`
    pub async fn set_reminder(&mut self, start_date: NaiveDate) -> Result<ReminderStatus, ZakatError> {
        let reminder = HawlReminder::new(start_date)?;
        self.store.save_reminder(start_date).await?;
        self.reminder = Some(reminder);
        info!(start_date = %start_date, "Reminder set");
        Ok(reminder.status(self.today()))
    }

    /// Restarts the reminder's hawl from today
    pub async fn mark_reminder_paid(&mut self) -> Result<ReminderStatus, ZakatError> {
        let today = self.today();
        let mut reminder = self
            .reminder
            .ok_or_else(|| ZakatError::validation("Set a hawl start date first"))?;
        reminder.mark_paid(today)?;
        self.store.save_reminder(today).await?;
        self.reminder = Some(reminder);
        info!(start_date = %today, "Reminder marked paid");
        Ok(reminder.status(today))
    }

    /// Saves `ledger` and makes it the live ledger; on failure the live
    /// ledger is left as it was
    async fn commit(&mut self, ledger: ZakatLedger) -> Result<(), ZakatError> {
        self.persist(&ledger).await?;
        self.ledger = ledger;
        Ok(())
    }

    async fn persist(&self, ledger: &ZakatLedger) -> Result<(), ZakatError> {
        self.store.save_entries(ledger.entries()).await?;
        debug!(entries = ledger.len(), "Ledger saved");
        Ok(())
    }
}
