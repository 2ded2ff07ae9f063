//! Flight listing, seat map and pool status handlers.

use axum::Json;
use axum::extract::{Path, State};

use skyseat_core::types::FlightId;
use skyseat_entity::allocation::PoolStatus;
use skyseat_entity::flight::Flight;

use crate::dto::response::{ApiResponse, SeatMapResponse, SeatResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/flights
pub async fn list_flights(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Flight>>>, ApiError> {
    let flights = state.admin_service.list_flights().await?;
    Ok(Json(ApiResponse::ok(flights)))
}

/// GET /api/flights/{flight_id}/seats
pub async fn list_seats(
    State(state): State<AppState>,
    Path(flight_id): Path<FlightId>,
) -> Result<Json<ApiResponse<SeatMapResponse>>, ApiError> {
    let seats = state.admin_service.list_seats(flight_id).await?;
    Ok(Json(ApiResponse::ok(SeatMapResponse {
        flight_id,
        seats: seats.into_iter().map(SeatResponse::from).collect(),
    })))
}

/// GET /api/flights/{flight_id}/status
pub async fn pool_status(
    State(state): State<AppState>,
    Path(flight_id): Path<FlightId>,
) -> Result<Json<ApiResponse<PoolStatus>>, ApiError> {
    let status = state.admin_service.pool_status(flight_id).await?;
    Ok(Json(ApiResponse::ok(status)))
}
