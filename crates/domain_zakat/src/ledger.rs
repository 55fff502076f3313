//! The entry ledger
//!
//! Owns the ordered collection of asset entries and applies every change to
//! it. Reports are computed on demand through the engine functions.

use chrono::NaiveDate;

use core_kernel::{Currency, EntryId};

use crate::aggregate::{aggregate_liability, ZakatResult};
use crate::asset::AssetEntry;
use crate::error::ZakatError;
use crate::liability::MarketRates;
use crate::nisab::{assess_eligibility, EligibilityReport, NisabStandard};
use crate::validation::ValidatedEntry;

/// Ordered collection of asset entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZakatLedger {
    entries: Vec<AssetEntry>,
}

impl ZakatLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<AssetEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[AssetEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&AssetEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn get_mut(&mut self, id: EntryId) -> Result<&mut AssetEntry, ZakatError> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(ZakatError::EntryNotFound(id))
    }

    /// Appends a new entry with periods generated up to `today`
    pub fn add(&mut self, input: ValidatedEntry, today: NaiveDate) -> &AssetEntry {
        let index = self.entries.len();
        self.entries.push(AssetEntry::from_validated(input, today));
        &self.entries[index]
    }

    /// Replaces an entry's values, keeping paid flags by due date
    pub fn edit(
        &mut self,
        id: EntryId,
        input: ValidatedEntry,
        today: NaiveDate,
    ) -> Result<&AssetEntry, ZakatError> {
        let entry = self.get_mut(id)?;
        entry.revise(input, today);
        Ok(entry)
    }

    /// Removes an entry
    pub fn remove(&mut self, id: EntryId) -> Result<AssetEntry, ZakatError> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(ZakatError::EntryNotFound(id))?;
        Ok(self.entries.remove(index))
    }

    /// Flips the paid flag of one period
    ///
    /// # Returns
    ///
    /// The entry and whether a period matched `due_date`. An unmatched date
    /// leaves the entry unchanged.
    pub fn toggle_period(
        &mut self,
        id: EntryId,
        due_date: NaiveDate,
    ) -> Result<(&AssetEntry, bool), ZakatError> {
        let entry = self.get_mut(id)?;
        let toggled = entry.toggle_period(due_date);
        if toggled {
            entry.touch();
        }
        Ok((&*entry, toggled))
    }

    /// Brings every entry's periods up to `today`
    ///
    /// # Returns
    ///
    /// The number of entries whose periods changed
    pub fn refresh(&mut self, today: NaiveDate) -> usize {
        self.entries
            .iter_mut()
            .map(|e| e.refresh_periods(today))
            .filter(|changed| *changed)
            .count()
    }

    pub fn summary(&self, rates: &MarketRates, currency: Currency) -> ZakatResult {
        aggregate_liability(&self.entries, rates, currency)
    }

    pub fn eligibility(
        &self,
        rates: &MarketRates,
        standard: NisabStandard,
        today: NaiveDate,
    ) -> EligibilityReport {
        assess_eligibility(&self.entries, rates, standard, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetKind;
    use crate::validation::EntryDraft;
    use chrono::Days;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn cash(days_back: u64) -> ValidatedEntry {
        EntryDraft::new(AssetKind::Cash, dec!(10000), today() - Days::new(days_back))
            .validate()
            .unwrap()
    }

    #[test]
    fn test_add_and_remove() {
        let mut ledger = ZakatLedger::new();
        let id = ledger.add(cash(400), today()).id;
        assert_eq!(ledger.len(), 1);

        let removed = ledger.remove(id).unwrap();
        assert_eq!(removed.id, id);
        assert!(ledger.is_empty());
        assert!(ledger.remove(id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_edit_keeps_paid_flags() {
        let mut ledger = ZakatLedger::new();
        let id = ledger.add(cash(800), today()).id;
        let first_due = ledger.get(id).unwrap().missed_periods[0].due_date;
        ledger.toggle_period(id, first_due).unwrap();

        let mut revised = cash(800);
        revised.quantity = dec!(20000);
        let entry = ledger.edit(id, revised, today()).unwrap();
        assert!(entry.missed_periods[0].paid);
        assert!(!entry.missed_periods[1].paid);
        assert_eq!(entry.missed_periods[1].principal, dec!(20000));
    }

    #[test]
    fn test_toggle_unknown_date_is_silent() {
        let mut ledger = ZakatLedger::new();
        let id = ledger.add(cash(400), today()).id;
        let (_, toggled) = ledger.toggle_period(id, today()).unwrap();
        assert!(!toggled);
    }

    #[test]
    fn test_unknown_id() {
        let mut ledger = ZakatLedger::new();
        let err = ledger.toggle_period(EntryId::new(), today()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_refresh_counts_changed_entries() {
        let mut ledger = ZakatLedger::new();
        ledger.add(cash(350), today());
        ledger.add(cash(10), today());
        assert_eq!(ledger.refresh(today() + Days::new(5)), 1);
    }
}
