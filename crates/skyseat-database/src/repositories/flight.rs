//! Flight repository implementation.

use sqlx::PgPool;

use skyseat_core::result::AppResult;
use skyseat_entity::flight::Flight;

use crate::error::map_sqlx_error;

/// Read-only access to flights.
#[derive(Debug, Clone)]
pub struct FlightRepository {
    pool: PgPool,
}

impl FlightRepository {
    /// Create a new flight repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all flights by departure time.
    pub async fn find_all(&self) -> AppResult<Vec<Flight>> {
        sqlx::query_as::<_, Flight>("SELECT * FROM flights ORDER BY departs_at, flight_number")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to list flights", e))
    }
}
