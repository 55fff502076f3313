//! Request handlers

pub mod health;
pub mod entries;
pub mod summary;
pub mod rates;
pub mod reminder;
