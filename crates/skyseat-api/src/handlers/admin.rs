//! Administrative handlers.

use axum::Json;
use axum::extract::{Path, State};

use skyseat_entity::allocation::ResetSummary;

use crate::dto::response::{ApiResponse, ReleaseResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/admin/reset
pub async fn reset(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ResetSummary>>, ApiError> {
    let summary = state.admin_service.reset().await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// DELETE /api/bookings/{reference}/seat
pub async fn release_seat(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<ApiResponse<ReleaseResponse>>, ApiError> {
    let released_seat_id = state.admin_service.release(&reference).await?;
    Ok(Json(ApiResponse::ok(ReleaseResponse {
        reference,
        released_seat_id,
    })))
}
