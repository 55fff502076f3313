//! Entry handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use uuid::Uuid;

use core_kernel::EntryId;
use domain_zakat::EntryDraft;

use crate::dto::entries::*;
use crate::{error::ApiError, AppState};

/// Lists entries with periods brought up to today
pub async fn list_entries(
    State(state): State<AppState>,
) -> Result<Json<Vec<EntryResponse>>, ApiError> {
    let mut service = state.service.lock().await;
    service.refresh().await?;
    Ok(Json(service.entries().iter().map(EntryResponse::from).collect()))
}

/// Creates an entry
pub async fn create_entry(
    State(state): State<AppState>,
    Json(request): Json<EntryRequest>,
) -> Result<(StatusCode, Json<EntryResponse>), ApiError> {
    let draft = EntryDraft::from(request);
    let entry = state.service.lock().await.add_entry(&draft).await?;
    Ok((StatusCode::CREATED, Json(EntryResponse::from(&entry))))
}

/// Replaces an entry's values, keeping paid flags on matching due dates
pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<EntryRequest>,
) -> Result<Json<EntryResponse>, ApiError> {
    let draft = EntryDraft::from(request);
    let entry = state
        .service
        .lock()
        .await
        .edit_entry(EntryId::from_uuid(id), &draft)
        .await?;
    Ok(Json(EntryResponse::from(&entry)))
}

/// Deletes an entry
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .service
        .lock()
        .await
        .remove_entry(EntryId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Flips the paid flag on the period due on `due`
pub async fn toggle_period(
    State(state): State<AppState>,
    Path((id, due)): Path<(Uuid, NaiveDate)>,
) -> Result<Json<EntryResponse>, ApiError> {
    let entry = state
        .service
        .lock()
        .await
        .toggle_period(EntryId::from_uuid(id), due)
        .await?;
    Ok(Json(EntryResponse::from(&entry)))
}
