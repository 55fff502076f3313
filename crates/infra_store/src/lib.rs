//! Infrastructure Storage Layer
//!
//! This crate persists the zakat ledger in a small local key-value store,
//! the way a browser keeps it in local storage.
//!
//! # Architecture
//!
//! - [`kv`]: the key-value abstraction with in-memory and JSON-file backends
//! - [`schema`]: every persisted shape the ledger has had, by version
//! - [`migrations`]: one function per historical version, each lifting data
//!   to the next version
//! - [`repository`]: the `LedgerStore` adapter the domain service uses
//!
//! # Schema Versions
//!
//! | Version | Key            | Shape                                        |
//! |---------|----------------|----------------------------------------------|
//! | 1       | `zakatRows`    | flat rows without periods                    |
//! | 2       | `zakatEntries` | entries with `missedPeriods`                 |
//! | 3       | `zakatLedger`  | `{ "schemaVersion": 3, "entries": [...] }`   |
//!
//! The loader reads the newest key present and migrates forward. Malformed
//! data is never fatal: it loads as an empty ledger and is flagged.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_store::{EntryRepository, JsonFileStore};
//! use std::sync::Arc;
//!
//! let kv = Arc::new(JsonFileStore::new("./data"));
//! let repo = EntryRepository::new(kv, clock);
//! let service = ZakatService::open(Arc::new(repo), clock, Currency::EGP).await?;
//! ```

pub mod error;
pub mod kv;
pub mod schema;
pub mod migrations;
pub mod repository;

pub use error::StoreError;
pub use kv::{InMemoryStore, JsonFileStore, KeyValueStore};
pub use schema::{keys, CURRENT_SCHEMA_VERSION};
pub use repository::EntryRepository;
