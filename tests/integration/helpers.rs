//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use skyseat_api::{AppState, build_app};
use skyseat_core::config::{
    AllocationConfig, AppConfig, DatabaseConfig, LoggingConfig, ServerConfig,
};
use skyseat_core::types::FlightId;
use skyseat_service::MemorySeatStore;

/// Test application context
pub struct TestApp {
    /// The Axum app for making test requests
    pub router: Router,
    /// Store behind the app, for seeding and direct assertions
    pub store: MemorySeatStore,
    /// The seeded flight
    pub flight_id: FlightId,
}

impl TestApp {
    /// App over a flight with the given seats and unbound bookings, with no
    /// processing delay.
    pub fn new(seats: &[&str], references: &[&str]) -> Self {
        Self::with_allocation(AllocationConfig::without_delay(), seats, references)
    }

    /// App with explicit allocation tuning.
    pub fn with_allocation(
        allocation: AllocationConfig,
        seats: &[&str],
        references: &[&str],
    ) -> Self {
        let store = MemorySeatStore::new();
        let flight_id = store.seed_flight(seats).expect("Failed to seed flight");
        for reference in references {
            store
                .seed_booking(reference, flight_id)
                .expect("Failed to seed booking");
        }

        let state = AppState::new(test_config(allocation), Arc::new(store.clone()));
        Self {
            router: build_app(state),
            store,
            flight_id,
        }
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// POST a check-in for `reference` under `policy` ("safe" or "unsafe")
    pub async fn checkin(&self, policy: &str, reference: &str) -> TestResponse {
        self.request(
            "POST",
            &format!("/api/checkin/{policy}"),
            Some(serde_json::json!({ "reference": reference })),
        )
        .await
    }
}

/// Configuration for tests; the database section is never used.
pub fn test_config(allocation: AllocationConfig) -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig::with_url("postgres://unused@localhost/unused"),
        allocation,
        logging: LoggingConfig::default(),
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// `data` field of a success body
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// `error` code of a failure body
    pub fn error_code(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }
}
