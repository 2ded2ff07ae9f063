//! Check-in handlers: one per allocation policy.

use axum::Json;
use axum::extract::State;
use validator::Validate;

use skyseat_core::error::AppError;
use skyseat_entity::allocation::{AllocationPolicy, SeatAssignment};

use crate::dto::request::CheckinRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/checkin/unsafe
pub async fn checkin_unsafe(
    State(state): State<AppState>,
    Json(req): Json<CheckinRequest>,
) -> Result<Json<ApiResponse<SeatAssignment>>, ApiError> {
    checkin(&state, AllocationPolicy::Unsafe, req).await
}

/// POST /api/checkin/safe
pub async fn checkin_safe(
    State(state): State<AppState>,
    Json(req): Json<CheckinRequest>,
) -> Result<Json<ApiResponse<SeatAssignment>>, ApiError> {
    checkin(&state, AllocationPolicy::Safe, req).await
}

async fn checkin(
    state: &AppState,
    policy: AllocationPolicy,
    req: CheckinRequest,
) -> Result<Json<ApiResponse<SeatAssignment>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(format!("Invalid check-in request: {e}")))?;

    let assignment = state
        .allocation_service
        .allocate(policy, &req.reference, req.flight_id)
        .await?;

    Ok(Json(ApiResponse::ok(assignment)))
}
