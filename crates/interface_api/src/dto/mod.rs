//! Request and response bodies

pub mod entries;
pub mod summary;
pub mod rates;
pub mod reminder;
