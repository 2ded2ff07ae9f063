//! Integration tests for the check-in endpoints.

mod helpers;

use std::collections::HashSet;

use axum::http::StatusCode;
use futures::future::join_all;

use skyseat_core::config::AllocationConfig;

#[tokio::test]
async fn test_safe_checkin_assigns_first_seat() {
    let app = helpers::TestApp::new(&["1A", "1B"], &["ABC123"]);

    let response = app.checkin("safe", "ABC123").await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.data()["seat_number"], "1A");
    assert_eq!(response.data()["policy"], "safe");
    assert_eq!(response.data()["already_assigned"], false);
}

#[tokio::test]
async fn test_unsafe_checkin_assigns_first_seat() {
    let app = helpers::TestApp::new(&["1A", "1B"], &["ABC123"]);

    let response = app.checkin("unsafe", "ABC123").await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["seat_number"], "1A");
    assert_eq!(response.data()["policy"], "unsafe");
}

#[tokio::test]
async fn test_repeat_checkin_returns_existing_seat() {
    let app = helpers::TestApp::new(&["1A", "1B"], &["ABC123"]);

    let first = app.checkin("safe", "ABC123").await;
    let second = app.checkin("unsafe", "ABC123").await;

    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.data()["already_assigned"], true);
    assert_eq!(second.data()["seat_id"], first.data()["seat_id"]);
}

#[tokio::test]
async fn test_unknown_reference_is_not_found_and_not_retryable() {
    let app = helpers::TestApp::new(&["1A"], &[]);

    let response = app.checkin("safe", "NOPE00").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), Some("UNKNOWN_REQUESTER"));
    assert_eq!(response.body["retryable"], false);
}

#[tokio::test]
async fn test_full_flight_is_a_retryable_conflict() {
    let app = helpers::TestApp::new(&["1A"], &["ABC123", "DEF456"]);
    app.checkin("safe", "ABC123").await;

    let response = app.checkin("safe", "DEF456").await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), Some("POOL_EXHAUSTED"));
    assert_eq!(response.body["retryable"], true);
}

#[tokio::test]
async fn test_blank_reference_is_rejected() {
    let app = helpers::TestApp::new(&["1A"], &["ABC123"]);

    let response = app.checkin("safe", "").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some("VALIDATION"));
}

#[tokio::test]
async fn test_explicit_flight_id_is_honoured() {
    let app = helpers::TestApp::new(&["1A"], &["ABC123"]);
    let other = app.store.seed_flight(&["7F"]).unwrap();

    let response = app
        .request(
            "POST",
            "/api/checkin/safe",
            Some(serde_json::json!({ "reference": "ABC123", "flight_id": other })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["seat_number"], "7F");
}

#[tokio::test]
async fn test_concurrent_safe_checkins_never_share_a_seat() {
    let seats = ["1A", "1B", "1C", "1D"];
    let references: Vec<String> = (0..9).map(|i| format!("PAX{i:03}")).collect();
    let refs: Vec<&str> = references.iter().map(String::as_str).collect();
    let app = helpers::TestApp::new(&seats, &refs);

    let responses = join_all(refs.iter().map(|r| app.checkin("safe", r))).await;

    let seat_ids: Vec<String> = responses
        .iter()
        .filter(|r| r.status == StatusCode::OK)
        .map(|r| r.data()["seat_id"].as_str().unwrap().to_string())
        .collect();
    let distinct: HashSet<&String> = seat_ids.iter().collect();
    assert_eq!(seat_ids.len(), seats.len());
    assert_eq!(distinct.len(), seats.len());

    for response in responses.iter().filter(|r| r.status != StatusCode::OK) {
        assert_eq!(response.error_code(), Some("POOL_EXHAUSTED"));
    }
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_unsafe_checkins_collide_at_the_ledger() {
    let allocation = AllocationConfig {
        processing_delay_min_ms: 25,
        processing_delay_max_ms: 25,
        ..AllocationConfig::default()
    };
    let references: Vec<String> = (0..5).map(|i| format!("RUSH{i:02}")).collect();
    let refs: Vec<&str> = references.iter().map(String::as_str).collect();
    let app = helpers::TestApp::with_allocation(
        allocation,
        &["1A", "1B", "1C", "1D", "1E", "1F"],
        &refs,
    );

    let responses = join_all(refs.iter().map(|r| app.checkin("unsafe", r))).await;

    let collisions = responses
        .iter()
        .filter(|r| {
            matches!(
                r.error_code(),
                Some("CONSTRAINT_VIOLATION") | Some("EXHAUSTED_CANDIDATES")
            )
        })
        .count();
    assert!(collisions > 0, "expected the unsafe policy to race");

    let bound: Vec<_> = app
        .store
        .bookings()
        .unwrap()
        .into_iter()
        .filter_map(|b| b.seat_id)
        .collect();
    let distinct: HashSet<_> = bound.iter().collect();
    assert_eq!(bound.len(), distinct.len(), "a seat was bound twice");
}
