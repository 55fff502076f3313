//! Hawl reminder
//!
//! A single reminder tracking when the user's next annual payment falls due.
//! The hawl starts on a user-chosen date; paying restarts it from the day of
//! payment.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::temporal::{days_between, lunar_years_after};

use crate::error::ZakatError;

/// The reminder's stored state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HawlReminder {
    start_date: NaiveDate,
}

/// The reminder as seen on a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderStatus {
    pub start_date: NaiveDate,
    pub next_due: NaiveDate,
    /// Days from today until `next_due`; negative once overdue
    pub days_remaining: i64,
    pub due: bool,
}

impl HawlReminder {
    /// Creates a reminder whose hawl starts on `start_date`
    ///
    /// # Errors
    ///
    /// Returns a validation error if the due date cannot be represented
    pub fn new(start_date: NaiveDate) -> Result<Self, ZakatError> {
        lunar_years_after(start_date, 1).map_err(|e| ZakatError::validation(e.to_string()))?;
        Ok(Self { start_date })
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// One hawl after the start date
    pub fn next_due(&self) -> NaiveDate {
        lunar_years_after(self.start_date, 1).unwrap_or(NaiveDate::MAX)
    }

    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        days_between(today, self.next_due())
    }

    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.days_remaining(today) <= 0
    }

    /// Restarts the hawl from `today`
    pub fn mark_paid(&mut self, today: NaiveDate) -> Result<(), ZakatError> {
        *self = Self::new(today)?;
        Ok(())
    }

    pub fn status(&self, today: NaiveDate) -> ReminderStatus {
        let days_remaining = self.days_remaining(today);
        ReminderStatus {
            start_date: self.start_date,
            next_due: self.next_due(),
            days_remaining,
            due: days_remaining <= 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_next_due_is_one_hawl_later() {
        let reminder = HawlReminder::new(date(2024, 1, 1)).unwrap();
        assert_eq!(reminder.next_due(), date(2024, 1, 1) + Days::new(354));
    }

    #[test]
    fn test_days_remaining_counts_down() {
        let start = date(2024, 1, 1);
        let reminder = HawlReminder::new(start).unwrap();
        assert_eq!(reminder.days_remaining(start), 354);
        assert!(!reminder.is_due(start + Days::new(353)));
        assert!(reminder.is_due(start + Days::new(354)));
        assert_eq!(reminder.status(start + Days::new(360)).days_remaining, -6);
    }

    #[test]
    fn test_mark_paid_restarts_hawl() {
        let mut reminder = HawlReminder::new(date(2023, 1, 1)).unwrap();
        let today = date(2024, 2, 1);
        assert!(reminder.is_due(today));
        reminder.mark_paid(today).unwrap();
        assert_eq!(reminder.start_date(), today);
        assert_eq!(reminder.days_remaining(today), 354);
    }

    #[test]
    fn test_unrepresentable_start_is_rejected() {
        assert!(HawlReminder::new(NaiveDate::MAX).is_err());
    }
}
