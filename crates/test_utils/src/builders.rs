//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible
//! defaults. Tests specify only the fields they care about.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use core_kernel::{Currency, EntryId};
use domain_zakat::{
    AssetEntry, AssetKind, EntryDraft, LoadedLedger, MockLedgerStore, ZakatService,
};
use infra_store::{EntryRepository, InMemoryStore};

use crate::fixtures::DateFixtures;

/// Builder for asset entries
///
/// Periods are generated against [`DateFixtures::today`] unless another
/// date is given.
pub struct AssetEntryBuilder {
    id: Option<EntryId>,
    kind: AssetKind,
    label: Option<String>,
    quantity: Decimal,
    valuation_date: Option<NaiveDate>,
    gold_rate: Option<Decimal>,
    fitr_rate: Option<Decimal>,
    today: NaiveDate,
    paid_periods: Vec<usize>,
}

impl Default for AssetEntryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetEntryBuilder {
    /// Creates a builder for 10000 in cash valued one hawl ago
    pub fn new() -> Self {
        Self {
            id: None,
            kind: AssetKind::Cash,
            label: None,
            quantity: dec!(10000),
            valuation_date: Some(DateFixtures::one_hawl_ago()),
            gold_rate: None,
            fitr_rate: None,
            today: DateFixtures::today(),
            paid_periods: Vec::new(),
        }
    }

    /// Shorthand for a gold entry in grams
    pub fn gold(grams: Decimal) -> Self {
        Self::new().with_kind(AssetKind::Gold).with_quantity(grams)
    }

    /// Shorthand for a named stock holding
    pub fn stocks(label: impl Into<String>, value: Decimal) -> Self {
        Self::new()
            .with_kind(AssetKind::Stocks)
            .with_label(label)
            .with_quantity(value)
    }

    /// Shorthand for zakat al-fitr on a number of people
    pub fn fitr(people: Decimal) -> Self {
        Self::new().with_kind(AssetKind::Fitr).with_quantity(people)
    }

    pub fn with_id(mut self, id: EntryId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_kind(mut self, kind: AssetKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn valued_on(mut self, date: NaiveDate) -> Self {
        self.valuation_date = Some(date);
        self
    }

    /// Sets the valuation date `days` before today
    pub fn valued_days_ago(self, days: u64) -> Self {
        self.valued_on(DateFixtures::days_ago(days))
    }

    /// Leaves the entry without a valuation date, so it has no periods
    pub fn undated(mut self) -> Self {
        self.valuation_date = None;
        self
    }

    /// Snapshots a gold price per gram on the entry
    pub fn with_gold_rate(mut self, rate: Decimal) -> Self {
        self.gold_rate = Some(rate);
        self
    }

    /// Snapshots a fitr value per person on the entry
    pub fn with_fitr_rate(mut self, rate: Decimal) -> Self {
        self.fitr_rate = Some(rate);
        self
    }

    /// Generates periods as of `today` instead of the fixture date
    pub fn as_of(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Marks the period at `index` (in due-date order) paid
    pub fn with_paid_period(mut self, index: usize) -> Self {
        self.paid_periods.push(index);
        self
    }

    /// Builds the entry
    pub fn build(self) -> AssetEntry {
        let mut entry = AssetEntry::new(
            self.kind,
            self.label,
            self.quantity,
            self.valuation_date,
            self.today,
        )
        .with_rate_snapshots(self.gold_rate, self.fitr_rate);

        if let Some(id) = self.id {
            entry.id = id;
        }
        for index in self.paid_periods {
            if let Some(period) = entry.missed_periods.get_mut(index) {
                period.paid = true;
            }
        }
        entry
    }
}

/// Builder for entry drafts as a form or API body would submit them
pub struct EntryDraftBuilder {
    draft: EntryDraft,
}

impl Default for EntryDraftBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryDraftBuilder {
    /// Creates a complete cash draft valued one hawl ago
    pub fn new() -> Self {
        Self {
            draft: EntryDraft::new(AssetKind::Cash, dec!(10000), DateFixtures::one_hawl_ago()),
        }
    }

    pub fn with_kind(mut self, kind: Option<AssetKind>) -> Self {
        self.draft.kind = kind;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.draft.label = Some(label.into());
        self
    }

    pub fn with_quantity(mut self, quantity: Option<Decimal>) -> Self {
        self.draft.quantity = quantity;
        self
    }

    pub fn with_valuation_date(mut self, date: Option<NaiveDate>) -> Self {
        self.draft.valuation_date = date;
        self
    }

    pub fn build(self) -> EntryDraft {
        self.draft
    }
}

/// Ready-made services over test stores
pub struct ServiceFixtures;

impl ServiceFixtures {
    /// A service over a mock store pre-loaded with `entries`
    pub async fn with_mock(entries: Vec<AssetEntry>) -> (ZakatService, MockLedgerStore) {
        let store = MockLedgerStore::with_loaded(LoadedLedger::current(entries));
        let service = ZakatService::open(
            Arc::new(store.clone()),
            Arc::new(DateFixtures::clock()),
            Currency::EGP,
        )
        .await
        .unwrap();
        (service, store)
    }

    /// A service over the real repository backed by `kv`
    pub async fn with_repository(kv: Arc<InMemoryStore>) -> ZakatService {
        let clock = Arc::new(DateFixtures::clock());
        let store = Arc::new(EntryRepository::new(kv, clock.clone()));
        ZakatService::open(store, clock, Currency::EGP).await.unwrap()
    }
}
