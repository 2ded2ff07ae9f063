//! Seat repository implementation.
//!
//! Every query that picks "the next" seat orders by `position, seat_number`
//! so that both allocation policies consume seats in the same order.

use sqlx::{PgConnection, PgPool};

use skyseat_core::result::AppResult;
use skyseat_core::types::{FlightId, SeatId};
use skyseat_entity::seat::Seat;

use crate::error::map_sqlx_error;

/// Repository for seat reads, availability flips, and row locking.
#[derive(Debug, Clone)]
pub struct SeatRepository {
    pool: PgPool,
}

impl SeatRepository {
    /// Create a new seat repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a seat by ID.
    pub async fn find_by_id(&self, id: SeatId) -> AppResult<Option<Seat>> {
        sqlx::query_as::<_, Seat>("SELECT * FROM seats WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to find seat", e))
    }

    /// List every seat of a flight in allocation order.
    pub async fn find_by_flight(&self, flight_id: FlightId) -> AppResult<Vec<Seat>> {
        sqlx::query_as::<_, Seat>(
            "SELECT * FROM seats WHERE flight_id = $1 ORDER BY position, seat_number",
        )
        .bind(flight_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to list seats", e))
    }

    /// Read up to `limit` available seats in allocation order.
    ///
    /// Plain read: no lock is taken and concurrent readers see the same rows.
    pub async fn find_available(&self, flight_id: FlightId, limit: i64) -> AppResult<Vec<Seat>> {
        sqlx::query_as::<_, Seat>(
            "SELECT * FROM seats \
             WHERE flight_id = $1 AND is_available = TRUE \
             ORDER BY position, seat_number \
             LIMIT $2",
        )
        .bind(flight_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to query available seats", e))
    }

    /// Re-read the current availability flag of one seat.
    pub async fn is_available(&self, id: SeatId) -> AppResult<Option<bool>> {
        sqlx::query_scalar::<_, bool>("SELECT is_available FROM seats WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to read seat availability", e))
    }

    /// Flip a seat to unavailable only if it is still available.
    ///
    /// Returns `true` when this call performed the flip.
    pub async fn claim_if_available(&self, id: SeatId) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE seats SET is_available = FALSE, updated_at = NOW() \
             WHERE id = $1 AND is_available = TRUE",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to claim seat", e))?;
        Ok(result.rows_affected() == 1)
    }

    /// Seat counts for a flight as `(total, available)`.
    pub async fn count_by_flight(&self, flight_id: FlightId) -> AppResult<(i64, i64)> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE is_available) \
             FROM seats WHERE flight_id = $1",
        )
        .bind(flight_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to count seats", e))
    }

    /// Select and lock the first available seat of a flight.
    ///
    /// Rows already locked by another transaction are skipped rather than
    /// waited on, so concurrent callers each walk to a different seat.
    pub async fn lock_next_available(
        conn: &mut PgConnection,
        flight_id: FlightId,
    ) -> AppResult<Option<Seat>> {
        sqlx::query_as::<_, Seat>(
            "SELECT * FROM seats \
             WHERE flight_id = $1 AND is_available = TRUE \
             ORDER BY position, seat_number \
             LIMIT 1 \
             FOR UPDATE SKIP LOCKED",
        )
        .bind(flight_id)
        .fetch_optional(conn)
        .await
        .map_err(|e| map_sqlx_error("Failed to lock next available seat", e))
    }

    /// Load one seat inside a transaction.
    pub async fn find_by_id_in(conn: &mut PgConnection, id: SeatId) -> AppResult<Option<Seat>> {
        sqlx::query_as::<_, Seat>("SELECT * FROM seats WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(|e| map_sqlx_error("Failed to find seat", e))
    }

    /// Set a seat's availability flag unconditionally.
    pub async fn set_available(
        conn: &mut PgConnection,
        id: SeatId,
        available: bool,
    ) -> AppResult<()> {
        sqlx::query("UPDATE seats SET is_available = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(available)
            .execute(conn)
            .await
            .map_err(|e| map_sqlx_error("Failed to update seat availability", e))?;
        Ok(())
    }

    /// Mark every unavailable seat available again. Returns rows changed.
    pub async fn release_all(conn: &mut PgConnection) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE seats SET is_available = TRUE, updated_at = NOW() WHERE is_available = FALSE",
        )
        .execute(conn)
        .await
        .map_err(|e| map_sqlx_error("Failed to release seats", e))?;
        Ok(result.rows_affected())
    }
}
