//! Core Kernel - Foundational types for the zakat ledger
//!
//! This crate provides the building blocks shared by every other crate:
//! - Money, Currency and Rate with exact decimal arithmetic
//! - Lunar-year (hawl) date arithmetic and an injectable clock
//! - Strongly-typed identifiers
//! - Port error types for adapters

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError, Rate, round_half_up};
pub use temporal::{Clock, SystemClock, FixedClock, Timezone, TemporalError, LUNAR_YEAR_DAYS};
pub use identifiers::EntryId;
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
