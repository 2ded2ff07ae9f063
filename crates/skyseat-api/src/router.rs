//! Route definitions for the SkySeat HTTP API.
//!
//! All routes are mounted under `/api`.

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with all routes and request logging.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(checkin_routes())
        .merge(booking_routes())
        .merge(flight_routes())
        .merge(admin_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Seat allocation, one route per policy
fn checkin_routes() -> Router<AppState> {
    Router::new()
        .route("/checkin/unsafe", post(handlers::checkin::checkin_unsafe))
        .route("/checkin/safe", post(handlers::checkin::checkin_safe))
}

fn booking_routes() -> Router<AppState> {
    Router::new().route(
        "/bookings/{reference}/seat",
        delete(handlers::admin::release_seat),
    )
}

fn flight_routes() -> Router<AppState> {
    Router::new()
        .route("/flights", get(handlers::flight::list_flights))
        .route("/flights/{flight_id}/seats", get(handlers::flight::list_seats))
        .route("/flights/{flight_id}/status", get(handlers::flight::pool_status))
}

fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/reset", post(handlers::admin::reset))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
