//! Summary and eligibility handlers

use axum::{
    extract::{Query, State},
    Json,
};

use domain_zakat::EligibilityReport;

use crate::dto::summary::*;
use crate::{error::ApiError, AppState};

/// Computes the amount owed across all unpaid periods
pub async fn get_summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, ApiError> {
    let snapshot = state.rates.snapshot().await;
    let mut service = state.service.lock().await;
    service.refresh().await?;
    let report = service.summary(&snapshot.rates).await?;
    Ok(Json(SummaryResponse::new(
        report,
        snapshot.updated_at,
        service.load_report(),
    )))
}

/// Reports nisab and hawl status per asset kind
pub async fn get_eligibility(
    State(state): State<AppState>,
    Query(query): Query<EligibilityQuery>,
) -> Json<EligibilityReport> {
    let rates = state.rates.current().await;
    let service = state.service.lock().await;
    Json(service.eligibility(&rates, query.standard.unwrap_or_default()))
}
