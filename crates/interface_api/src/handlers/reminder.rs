//! Hawl reminder handlers

use axum::{extract::State, Json};

use domain_zakat::ReminderStatus;

use crate::dto::reminder::*;
use crate::{error::ApiError, AppState};

/// Current reminder, or null when none is set
pub async fn get_reminder(State(state): State<AppState>) -> Json<Option<ReminderStatus>> {
    Json(state.service.lock().await.reminder())
}

/// Starts the reminder on the given date
pub async fn set_reminder(
    State(state): State<AppState>,
    Json(request): Json<SetReminderRequest>,
) -> Result<Json<ReminderStatus>, ApiError> {
    let status = state
        .service
        .lock()
        .await
        .set_reminder(request.start_date)
        .await?;
    Ok(Json(status))
}

/// Records that zakat was paid today and restarts the hawl
pub async fn mark_paid(State(state): State<AppState>) -> Result<Json<ReminderStatus>, ApiError> {
    let status = state.service.lock().await.mark_reminder_paid().await?;
    Ok(Json(status))
}
