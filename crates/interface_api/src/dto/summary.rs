//! Summary and eligibility DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::Currency;
use domain_zakat::{BreakdownRow, LoadReport, NisabStandard, SummaryReport};

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub currency: Currency,
    pub total: Decimal,
    pub breakdown: Vec<BreakdownRow>,
    pub unpaid_periods: usize,
    /// Present when the previously cached total differed from this one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_drift: Option<Decimal>,
    pub rates_updated_at: Option<DateTime<Utc>>,
    pub load: LoadReport,
}

impl SummaryResponse {
    pub fn new(
        report: SummaryReport,
        rates_updated_at: Option<DateTime<Utc>>,
        load: LoadReport,
    ) -> Self {
        let result = report.result;
        Self {
            currency: result.currency,
            total: result.total,
            breakdown: result.breakdown,
            unpaid_periods: result.unpaid_periods,
            cache_drift: report.cache_drift,
            rates_updated_at,
            load,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EligibilityQuery {
    pub standard: Option<NisabStandard>,
}
