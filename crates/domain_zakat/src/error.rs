//! Zakat domain errors
//!
//! The engine itself never fails: missing market data degrades to a zero
//! contribution. Errors arise only at the edges, from input validation,
//! unknown entry ids, storage and rate sources.

use thiserror::Error;

use core_kernel::{EntryId, PortError};

/// Errors that can occur in the zakat domain
#[derive(Debug, Error)]
pub enum ZakatError {
    /// Input failed validation; the message is shown to the user as is
    #[error("{0}")]
    Validation(String),

    /// No entry with the given id exists in the ledger
    #[error("Entry not found: {0}")]
    EntryNotFound(EntryId),

    /// The storage port failed
    #[error("Storage error: {0}")]
    Storage(#[from] PortError),

    /// A market rate could not be fetched
    #[error("{rate} rate unavailable: {reason}")]
    RateUnavailable {
        rate: &'static str,
        reason: String,
    },
}

impl ZakatError {
    /// Creates a Validation error with a user-facing message
    pub fn validation(message: impl Into<String>) -> Self {
        ZakatError::Validation(message.into())
    }

    /// Creates a RateUnavailable error
    pub fn rate_unavailable(rate: &'static str, reason: impl std::fmt::Display) -> Self {
        ZakatError::RateUnavailable {
            rate,
            reason: reason.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ZakatError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ZakatError::EntryNotFound(_))
    }
}
