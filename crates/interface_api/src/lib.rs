//! HTTP API Layer
//!
//! This crate provides the REST API for the zakat ledger using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for entries, summary, rates and reminder
//! - **Middleware**: Request ids, tracing and request logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! One [`ZakatService`] owns the ledger; handlers take turns on it through a
//! mutex, so every change is saved before the next request sees the ledger.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(service, RateBoard::new(), quotes, config);
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_zakat::{MarketRatePort, RateBoard, ZakatService};

use crate::config::ApiConfig;
use crate::handlers::{entries, health, rates, reminder, summary};
use crate::middleware::request_log_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<Mutex<ZakatService>>,
    pub rates: RateBoard,
    pub quotes: Arc<dyn MarketRatePort>,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(
        service: ZakatService,
        rates: RateBoard,
        quotes: Arc<dyn MarketRatePort>,
        config: ApiConfig,
    ) -> Self {
        Self {
            service: Arc::new(Mutex::new(service)),
            rates,
            quotes,
            config,
        }
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Ledger service, rate board and quote feed
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Entry routes
    let entry_routes = Router::new()
        .route("/", get(entries::list_entries).post(entries::create_entry))
        .route("/:id", put(entries::update_entry).delete(entries::delete_entry))
        .route("/:id/periods/:due/toggle", post(entries::toggle_period));

    // Rate routes
    let rate_routes = Router::new()
        .route("/", get(rates::get_rates).put(rates::update_rates))
        .route("/refresh", post(rates::refresh_rates));

    // Reminder routes
    let reminder_routes = Router::new()
        .route("/", get(reminder::get_reminder).put(reminder::set_reminder))
        .route("/paid", post(reminder::mark_paid));

    let api_routes = Router::new()
        .nest("/entries", entry_routes)
        .nest("/rates", rate_routes)
        .nest("/reminder", reminder_routes)
        .route("/summary", get(summary::get_summary))
        .route("/eligibility", get(summary::get_eligibility))
        .layer(axum_middleware::from_fn(request_log_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
