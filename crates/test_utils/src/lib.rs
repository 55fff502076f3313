//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! zakat ledger test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pinned dates, rates and stored payloads of every schema version
//! - `builders`: Builder patterns for entries, drafts and ready-made services
//! - `assertions`: Custom assertion helpers for periods and summaries
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
