//! Zakat Domain Ports
//!
//! This module defines the port interfaces the zakat domain needs from the
//! outside world, so the ledger service can run against a JSON file, an
//! in-memory store or a mock without change.
//!
//! - **LedgerStore**: persisted entries, the reminder start date and the
//!   cached summary
//! - **MarketRatePort**: the current gold price and fitr value
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_zakat::{ZakatService, ports::LedgerStore};
//! use std::sync::Arc;
//!
//! let store: Arc<dyn LedgerStore> = Arc::new(EntryRepository::new(kv));
//! let service = ZakatService::open(store, clock, Currency::EGP).await?;
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use core_kernel::{DomainPort, HealthCheckable, PortError};

use crate::aggregate::ZakatResult;
use crate::asset::AssetEntry;

/// Entries read back from storage, with how they were obtained
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedLedger {
    pub entries: Vec<AssetEntry>,
    /// Schema version the entries were migrated from, if not current
    pub migrated_from: Option<u32>,
    /// Whether stored data was unreadable and dropped
    pub discarded_corrupt: bool,
}

impl LoadedLedger {
    pub fn current(entries: Vec<AssetEntry>) -> Self {
        Self {
            entries,
            migrated_from: None,
            discarded_corrupt: false,
        }
    }
}

/// Persistence port for the ledger
///
/// Implementations must not fail on malformed stored data; they return an
/// empty ledger with `discarded_corrupt` set instead. Writes replace the
/// previous value (last write wins).
#[async_trait]
pub trait LedgerStore: DomainPort + HealthCheckable {
    /// Loads all entries, migrating older schemas
    async fn load_entries(&self) -> Result<LoadedLedger, PortError>;

    /// Replaces all stored entries
    async fn save_entries(&self, entries: &[AssetEntry]) -> Result<(), PortError>;

    /// Loads the reminder's hawl start date
    async fn load_reminder(&self) -> Result<Option<NaiveDate>, PortError>;

    /// Stores the reminder's hawl start date
    async fn save_reminder(&self, start_date: NaiveDate) -> Result<(), PortError>;

    /// Loads the last computed summary
    async fn load_cached_result(&self) -> Result<Option<ZakatResult>, PortError>;

    /// Stores the last computed summary
    async fn save_cached_result(&self, result: &ZakatResult) -> Result<(), PortError>;
}

/// Source of market rates
///
/// # Returns
///
/// Prices in the reporting currency; callers treat them as opaque numbers
#[async_trait]
pub trait MarketRatePort: DomainPort + HealthCheckable {
    /// Current gold price per gram
    async fn gold_price_per_gram(&self) -> Result<Decimal, PortError>;

    /// Current Zakat al-Fitr value per person
    async fn fitr_per_person(&self) -> Result<Decimal, PortError>;
}

/// Mock implementations for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::RwLock;
    use core_kernel::HealthCheckResult;

    #[derive(Debug, Default)]
    struct MockState {
        loaded: LoadedLedger,
        saved: Option<Vec<AssetEntry>>,
        reminder: Option<NaiveDate>,
        cached: Option<ZakatResult>,
    }

    /// In-memory mock implementation of LedgerStore
    #[derive(Debug, Default, Clone)]
    pub struct MockLedgerStore {
        state: Arc<RwLock<MockState>>,
        saves: Arc<AtomicUsize>,
        fail_writes: Arc<AtomicBool>,
    }

    impl MockLedgerStore {
        /// Creates an empty mock store
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates what the next load returns
        pub fn with_loaded(loaded: LoadedLedger) -> Self {
            let store = Self::new();
            if let Ok(mut state) = store.state.try_write() {
                state.loaded = loaded;
            }
            store
        }

        /// Makes every subsequent write fail
        pub fn fail_writes(&self) {
            self.fail_writes.store(true, Ordering::SeqCst);
        }

        /// Lets writes succeed again
        pub fn allow_writes(&self) {
            self.fail_writes.store(false, Ordering::SeqCst);
        }

        /// Number of successful entry saves
        pub fn save_count(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }

        /// The entries most recently saved
        pub async fn saved_entries(&self) -> Option<Vec<AssetEntry>> {
            self.state.read().await.saved.clone()
        }

        fn check_writable(&self) -> Result<(), PortError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(PortError::connection("mock store rejects writes"));
            }
            Ok(())
        }
    }

    impl DomainPort for MockLedgerStore {}

    #[async_trait]
    impl HealthCheckable for MockLedgerStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("mock-ledger-store", 0)
        }
    }

    #[async_trait]
    impl LedgerStore for MockLedgerStore {
        async fn load_entries(&self) -> Result<LoadedLedger, PortError> {
            let state = self.state.read().await;
            match &state.saved {
                Some(saved) => Ok(LoadedLedger::current(saved.clone())),
                None => Ok(state.loaded.clone()),
            }
        }

        async fn save_entries(&self, entries: &[AssetEntry]) -> Result<(), PortError> {
            self.check_writable()?;
            self.state.write().await.saved = Some(entries.to_vec());
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn load_reminder(&self) -> Result<Option<NaiveDate>, PortError> {
            Ok(self.state.read().await.reminder)
        }

        async fn save_reminder(&self, start_date: NaiveDate) -> Result<(), PortError> {
            self.check_writable()?;
            self.state.write().await.reminder = Some(start_date);
            Ok(())
        }

        async fn load_cached_result(&self) -> Result<Option<ZakatResult>, PortError> {
            Ok(self.state.read().await.cached.clone())
        }

        async fn save_cached_result(&self, result: &ZakatResult) -> Result<(), PortError> {
            self.check_writable()?;
            self.state.write().await.cached = Some(result.clone());
            Ok(())
        }
    }
}
