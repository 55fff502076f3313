//! API Tests
//!
//! Drives the router end to end with `oneshot` against an in-memory ledger
//! store, a pinned clock and an instant quote feed.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{Days, NaiveDate};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use core_kernel::{Currency, FixedClock};
use domain_zakat::{MarketRatePort, RateBoard, StaticQuoteAdapter, ZakatService};
use infra_store::{keys, EntryRepository, InMemoryStore, KeyValueStore};
use interface_api::{config::ApiConfig, create_router, AppState};

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn days_ago(days: u64) -> String {
    (today() - Days::new(days)).to_string()
}

async fn app_with(kv: Arc<InMemoryStore>) -> Router {
    let clock = Arc::new(FixedClock(today()));
    let store = Arc::new(EntryRepository::new(kv, clock.clone()));
    let service = ZakatService::open(store, clock, Currency::EGP).await.unwrap();
    let quotes: Arc<dyn MarketRatePort> = Arc::new(StaticQuoteAdapter::instant());
    create_router(AppState::new(service, RateBoard::new(), quotes, ApiConfig::default()))
}

async fn app() -> Router {
    app_with(Arc::new(InMemoryStore::new())).await
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create(app: &Router, body: Value) -> Value {
    let (status, json) = send(app, Method::POST, "/api/v1/entries", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json
}

mod health {
    use super::*;

    #[tokio::test]
    async fn test_health_and_readiness() {
        let app = app().await;
        let (status, json) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");

        let (status, json) = send(&app, Method::GET, "/health/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["components"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_request_id_is_returned() {
        let app = app().await;
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }
}

mod entries {
    use super::*;

    #[tokio::test]
    async fn test_create_generates_periods() {
        let app = app().await;
        let entry = create(
            &app,
            json!({"kind": "cash", "quantity": "10000", "valuation_date": days_ago(400)}),
        )
        .await;

        assert_eq!(entry["label"], "Cash");
        assert_eq!(entry["unpaid_periods"], 1);
        assert_eq!(entry["periods"][0]["due_date"], days_ago(46));

        let (status, list) = send(&app, Method::GET, "/api/v1/entries", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_validation_messages() {
        let app = app().await;
        let cases = [
            (json!({"kind": "cash", "valuation_date": days_ago(1)}), "Enter a valid value"),
            (
                json!({"kind": "gold", "quantity": "10000000000000000000000000000", "valuation_date": days_ago(400)}),
                "Enter a valid value",
            ),
            (json!({"quantity": "5", "valuation_date": days_ago(1)}), "Select zakat type"),
            (json!({"kind": "stocks", "quantity": "5", "valuation_date": days_ago(1)}), "Enter stock name"),
            (json!({"kind": "cash", "quantity": "5"}), "Enter value date"),
        ];
        for (body, message) in cases {
            let (status, json) = send(&app, Method::POST, "/api/v1/entries", Some(body)).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(json["message"], message);
        }
    }

    #[tokio::test]
    async fn test_update_keeps_paid_flags() {
        let app = app().await;
        let entry = create(
            &app,
            json!({"kind": "cash", "quantity": "10000", "valuation_date": days_ago(800)}),
        )
        .await;
        let id = entry["id"].as_str().unwrap().to_string();
        let first_due = entry["periods"][0]["due_date"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/v1/entries/{id}/periods/{first_due}/toggle"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, updated) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/entries/{id}"),
            Some(json!({"kind": "cash", "quantity": "20000", "valuation_date": days_ago(800)})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["periods"][0]["paid"], true);
        assert_eq!(updated["periods"][1]["paid"], false);
        assert_eq!(updated["unpaid_periods"], 1);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let app = app().await;
        let id = uuid::Uuid::new_v4();
        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/entries/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/v1/entries/{id}/periods/2025-01-01/toggle"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_removes_entry() {
        let app = app().await;
        let entry = create(
            &app,
            json!({"kind": "business", "quantity": "500", "valuation_date": days_ago(10)}),
        )
        .await;
        let uri = format!("/api/v1/entries/{}", entry["id"].as_str().unwrap());

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, list) = send(&app, Method::GET, "/api/v1/entries", None).await;
        assert!(list.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_changes_are_persisted() {
        let kv = Arc::new(InMemoryStore::new());
        let app = app_with(kv.clone()).await;
        create(
            &app,
            json!({"kind": "stocks", "label": "ACME", "quantity": "1000", "valuation_date": days_ago(30)}),
        )
        .await;

        let raw = kv.get(keys::LEDGER).await.unwrap().unwrap();
        assert!(raw.contains("ACME"));
    }
}

mod reporting {
    use super::*;

    #[tokio::test]
    async fn test_summary_uses_rates() {
        let app = app().await;
        create(
            &app,
            json!({"kind": "cash", "quantity": "10000", "valuation_date": days_ago(400)}),
        )
        .await;
        create(
            &app,
            json!({"kind": "gold", "quantity": "10", "valuation_date": days_ago(400)}),
        )
        .await;

        // No gold rate yet: gold contributes a zero row
        let (status, json) = send(&app, Method::GET, "/api/v1/summary", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total"], "250.00");
        assert_eq!(json["breakdown"][1]["amount"], "0.00");

        let (status, _) = send(&app, Method::POST, "/api/v1/rates/refresh", None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, json) = send(&app, Method::GET, "/api/v1/summary", None).await;
        assert_eq!(json["total"], "1125.00");
        assert_eq!(json["currency"], "EGP");
        assert_eq!(json["unpaid_periods"], 2);
    }

    #[tokio::test]
    async fn test_eligibility_standard_query() {
        let app = app().await;
        create(
            &app,
            json!({"kind": "gold", "quantity": "100", "valuation_date": days_ago(400)}),
        )
        .await;
        send(&app, Method::PUT, "/api/v1/rates", Some(json!({"gold": "3500"}))).await;

        let (status, json) = send(&app, Method::GET, "/api/v1/eligibility?standard=gold", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["standard"], "gold");
        assert_eq!(json["kinds"][0]["kind"], "gold");
        assert_eq!(json["kinds"][0]["nisab"], "met");
        assert_eq!(json["kinds"][0]["hawl_passed"], true);
    }
}

mod rates {
    use super::*;

    #[tokio::test]
    async fn test_manual_rates() {
        let app = app().await;
        let (status, json) = send(
            &app,
            Method::PUT,
            "/api/v1/rates",
            Some(json!({"silver": "45.5"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["silver"], "45.5");
        assert_eq!(json["gold"], Value::Null);

        let (status, _) = send(&app, Method::PUT, "/api/v1/rates", Some(json!({"gold": "-1"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_refresh_reports_feed_quotes() {
        let app = app().await;
        let (_, json) = send(&app, Method::POST, "/api/v1/rates/refresh", None).await;
        assert_eq!(json["rates"]["gold"], "3500");
        assert_eq!(json["rates"]["fitr"], "60");
        assert!(json["errors"].as_array().unwrap().is_empty());
    }
}

mod reminder {
    use super::*;

    #[tokio::test]
    async fn test_reminder_lifecycle() {
        let app = app().await;
        let (status, json) = send(&app, Method::GET, "/api/v1/reminder", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, Value::Null);

        let (status, _) = send(&app, Method::POST, "/api/v1/reminder/paid", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, json) = send(
            &app,
            Method::PUT,
            "/api/v1/reminder",
            Some(json!({"start_date": days_ago(360)})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["days_remaining"], -6);
        assert_eq!(json["due"], true);

        let (_, json) = send(&app, Method::POST, "/api/v1/reminder/paid", None).await;
        assert_eq!(json["start_date"], today().to_string());
        assert_eq!(json["days_remaining"], 354);
        assert_eq!(json["due"], false);
    }
}
