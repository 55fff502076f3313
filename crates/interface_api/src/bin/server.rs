//! Zakat Ledger - API Server Binary
//!
//! This binary starts the HTTP API server for the zakat ledger.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin zakat-api
//!
//! # Run with environment variables
//! ZAKAT_PORT=9000 ZAKAT_DATA_DIR=/var/lib/zakat cargo run --bin zakat-api
//! ```
//!
//! # Environment Variables
//!
//! * `ZAKAT_HOST` - Server host (default: 0.0.0.0)
//! * `ZAKAT_PORT` - Server port (default: 8080)
//! * `ZAKAT_DATA_DIR` - Directory for the ledger files (default: ./data)
//! * `ZAKAT_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `ZAKAT_CURRENCY` - Reporting currency code (default: EGP)
//! * `ZAKAT_TIMEZONE` - IANA timezone deciding "today" (default: UTC)
//! * `ZAKAT_QUOTE_DELAY_MS` - Delay of the mock quote feed (default: 700)
//! * `ZAKAT_GOLD_PER_GRAM` - Gold price served by the feed (default: 3500)
//! * `ZAKAT_FITR_PER_PERSON` - Fitr value served by the feed (default: 60)

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::SystemClock;
use domain_zakat::{MarketRatePort, RateBoard, StaticQuoteAdapter, ZakatService};
use infra_store::{EntryRepository, JsonFileStore};
use interface_api::{config::ApiConfig, create_router, AppState};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, opens the ledger, and starts
/// the HTTP server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let (config, config_error) = match ApiConfig::from_env() {
        Ok(config) => (config, None),
        Err(e) => (ApiConfig::default(), Some(e)),
    };

    init_tracing(&config.log_level);

    if let Some(e) = config_error {
        tracing::warn!(error = %e, "Invalid configuration, using defaults");
    }

    tracing::info!(
        host = %config.host,
        port = %config.port,
        data_dir = %config.data_dir.display(),
        currency = %config.currency,
        timezone = config.timezone.name(),
        "Starting Zakat Ledger API Server"
    );

    let clock = Arc::new(SystemClock::new(config.timezone));
    let kv = Arc::new(JsonFileStore::new(config.data_dir.clone()));
    let store = Arc::new(EntryRepository::new(kv, clock.clone()));

    let service = ZakatService::open(store, clock, config.currency)
        .await
        .context("opening ledger")?;

    let report = service.load_report();
    if report.discarded_corrupt {
        tracing::warn!("Stored ledger was unreadable; a copy was kept alongside it");
    }

    let rates = RateBoard::new();
    let quotes: Arc<dyn MarketRatePort> = Arc::new(StaticQuoteAdapter::new(config.quote_config()));
    spawn_initial_refresh(rates.clone(), quotes.clone());

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    let app = create_router(AppState::new(service, rates, quotes, config));

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// # Arguments
///
/// * `log_level` - The minimum log level to output (trace, debug, info, warn, error)
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Fetches the first quotes without delaying startup
fn spawn_initial_refresh(rates: RateBoard, quotes: Arc<dyn MarketRatePort>) {
    tokio::spawn(async move {
        let outcome = rates.refresh_all(quotes.as_ref()).await;
        if outcome.all_succeeded() {
            tracing::info!("Initial market rates loaded");
        } else {
            tracing::warn!("Initial market rates incomplete");
        }
    });
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
