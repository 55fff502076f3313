//! Market rate handlers

use axum::{extract::State, Json};
use rust_decimal::Decimal;
use tracing::{info, warn};

use domain_zakat::{validation::MSG_INVALID_VALUE, MarketRate};

use crate::dto::rates::*;
use crate::{error::ApiError, AppState};

/// Current rates and when they were last set
pub async fn get_rates(State(state): State<AppState>) -> Json<RatesResponse> {
    Json(state.rates.snapshot().await.into())
}

/// Sets rates by hand
pub async fn update_rates(
    State(state): State<AppState>,
    Json(request): Json<UpdateRatesRequest>,
) -> Result<Json<RatesResponse>, ApiError> {
    let updates = [
        (MarketRate::Gold, request.gold),
        (MarketRate::Silver, request.silver),
        (MarketRate::Fitr, request.fitr),
    ];
    if updates
        .iter()
        .any(|(_, value)| value.is_some_and(|v| v < Decimal::ZERO))
    {
        return Err(ApiError::Validation(MSG_INVALID_VALUE.to_string()));
    }

    for (market, value) in updates {
        if let Some(value) = value {
            state.rates.set(market, Some(value)).await;
            info!(rate = market.name(), value = %value, "Rate set manually");
        }
    }
    Ok(Json(state.rates.snapshot().await.into()))
}

/// Fetches gold and fitr from the quote feed
///
/// A failed lookup clears that rate; the response lists what failed.
pub async fn refresh_rates(State(state): State<AppState>) -> Json<RefreshResponse> {
    let outcome = state.rates.refresh_all(state.quotes.as_ref()).await;
    if !outcome.all_succeeded() {
        warn!("Rate refresh incomplete");
    }
    let snapshot = state.rates.snapshot().await;
    Json(RefreshResponse::new(&outcome, snapshot))
}
