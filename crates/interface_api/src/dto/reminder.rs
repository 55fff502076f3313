//! Reminder DTOs

use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SetReminderRequest {
    pub start_date: NaiveDate,
}
