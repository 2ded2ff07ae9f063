//! Integration tests for reset, release, seat map, status, and health.

mod helpers;

use axum::http::StatusCode;

#[tokio::test]
async fn test_reset_frees_all_seats() {
    let app = helpers::TestApp::new(&["1A", "1B", "1C"], &["ABC123", "DEF456"]);
    app.checkin("safe", "ABC123").await;
    app.checkin("unsafe", "DEF456").await;

    let response = app.request("POST", "/api/admin/reset", None).await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["seats_released"], 2);
    assert_eq!(response.data()["bookings_cleared"], 2);

    let status = app
        .request("GET", &format!("/api/flights/{}/status", app.flight_id), None)
        .await;
    assert_eq!(status.data()["available"], 3);
    assert_eq!(status.data()["assigned"], 0);
    assert!(app.store.bookings().unwrap().iter().all(|b| b.seat_id.is_none()));
}

#[tokio::test]
async fn test_release_returns_seat_to_pool() {
    let app = helpers::TestApp::new(&["1A"], &["ABC123", "DEF456"]);
    let assigned = app.checkin("safe", "ABC123").await;

    let response = app.request("DELETE", "/api/bookings/ABC123/seat", None).await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(
        response.data()["released_seat_id"],
        assigned.data()["seat_id"]
    );

    let again = app.request("DELETE", "/api/bookings/ABC123/seat", None).await;
    assert_eq!(again.status, StatusCode::OK);
    assert!(again.data()["released_seat_id"].is_null());

    let next = app.checkin("safe", "DEF456").await;
    assert_eq!(next.data()["seat_number"], "1A");
}

#[tokio::test]
async fn test_release_unknown_booking() {
    let app = helpers::TestApp::new(&["1A"], &[]);

    let response = app.request("DELETE", "/api/bookings/GHOST1/seat", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), Some("UNKNOWN_REQUESTER"));
}

#[tokio::test]
async fn test_seat_map_in_allocation_order() {
    let app = helpers::TestApp::new(&["1A", "1B", "2A"], &["ABC123"]);
    app.checkin("safe", "ABC123").await;

    let response = app
        .request("GET", &format!("/api/flights/{}/seats", app.flight_id), None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let seats = response.data()["seats"].as_array().unwrap();
    let labels: Vec<&str> = seats
        .iter()
        .map(|s| s["seat_number"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["1A", "1B", "2A"]);
    assert_eq!(seats[0]["is_available"], false);
    assert_eq!(seats[1]["is_available"], true);
}

#[tokio::test]
async fn test_list_flights() {
    let app = helpers::TestApp::new(&["1A", "1B"], &[]);

    let response = app.request("GET", "/api/flights", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let flights = response.data().as_array().unwrap().clone();
    assert_eq!(flights.len(), 1);
    assert_eq!(flights[0]["id"], app.flight_id.to_string());
    assert_eq!(flights[0]["flight_number"], "SK0001");
}

#[tokio::test]
async fn test_pool_status_counts() {
    let app = helpers::TestApp::new(&["1A", "1B", "1C"], &["ABC123"]);
    app.checkin("safe", "ABC123").await;

    let response = app
        .request("GET", &format!("/api/flights/{}/status", app.flight_id), None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["total"], 3);
    assert_eq!(response.data()["available"], 2);
    assert_eq!(response.data()["assigned"], 1);
}

#[tokio::test]
async fn test_malformed_flight_id_is_rejected() {
    let app = helpers::TestApp::new(&["1A"], &[]);

    let response = app.request("GET", "/api/flights/not-a-uuid/status", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new(&["1A"], &[]);

    let response = app.request("GET", "/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
    assert_eq!(response.data()["store"], "connected");
}
