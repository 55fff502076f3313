//! Market rate DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use domain_zakat::{RateSnapshot, RefreshOutcome};

/// Manual rate overrides; absent fields are left as they are
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRatesRequest {
    pub gold: Option<Decimal>,
    pub silver: Option<Decimal>,
    pub fitr: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct RatesResponse {
    pub gold: Option<Decimal>,
    pub silver: Option<Decimal>,
    pub fitr: Option<Decimal>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<RateSnapshot> for RatesResponse {
    fn from(snapshot: RateSnapshot) -> Self {
        Self {
            gold: snapshot.rates.gold,
            silver: snapshot.rates.silver,
            fitr: snapshot.rates.fitr,
            updated_at: snapshot.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub rates: RatesResponse,
    /// One message per rate that could not be fetched
    pub errors: Vec<String>,
}

impl RefreshResponse {
    pub fn new(outcome: &RefreshOutcome, snapshot: RateSnapshot) -> Self {
        let errors = [&outcome.gold, &outcome.fitr]
            .into_iter()
            .filter_map(|r| r.as_ref().err().map(|e| e.to_string()))
            .collect();
        Self {
            rates: snapshot.into(),
            errors,
        }
    }
}
