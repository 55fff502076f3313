//! Market Rate Adapters
//!
//! Implementations of [`MarketRatePort`](crate::ports::MarketRatePort).
//!
//! # Available Adapters
//!
//! - **StaticQuoteAdapter**: fixed quotes returned after an artificial
//!   delay, standing in for a live price feed
//!
//! # Usage
//!
//! ```rust
//! use domain_zakat::adapters::{StaticQuoteAdapter, StaticQuoteConfig};
//! use domain_zakat::MarketRatePort;
//! use std::sync::Arc;
//!
//! let adapter = StaticQuoteAdapter::new(StaticQuoteConfig::default());
//! let port: Arc<dyn MarketRatePort> = Arc::new(adapter);
//! ```

pub mod static_quotes;

pub use static_quotes::{StaticQuoteAdapter, StaticQuoteConfig};
