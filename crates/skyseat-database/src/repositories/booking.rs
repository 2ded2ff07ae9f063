//! Booking (reservation ledger) repository implementation.

use sqlx::{PgConnection, PgPool};

use skyseat_core::result::AppResult;
use skyseat_core::types::SeatId;
use skyseat_entity::booking::Booking;

use crate::error::map_sqlx_error;

const BIND_SEAT: &str = "UPDATE bookings \
     SET seat_id = $2, checked_in = TRUE, checked_in_at = NOW(), updated_at = NOW() \
     WHERE reference = $1 RETURNING *";

/// Repository for booking lookups and seat binding.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Create a new booking repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a booking by reservation code.
    pub async fn find_by_reference(&self, reference: &str) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE reference = $1")
            .bind(reference)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to find booking", e))
    }

    /// Bind a seat to a booking outside any transaction.
    ///
    /// Returns `None` if the reference is unknown. A seat already bound to
    /// another booking is rejected by the `UNIQUE (seat_id)` constraint and
    /// surfaces as `ErrorKind::ConstraintViolation`.
    pub async fn bind_seat(&self, reference: &str, seat_id: SeatId) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>(BIND_SEAT)
            .bind(reference)
            .bind(seat_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to bind seat", e))
    }

    /// Lock a booking row for the rest of the transaction.
    ///
    /// Uses `NOWAIT`: if another transaction holds the row the call fails
    /// immediately with `ErrorKind::Conflict` instead of queuing.
    pub async fn find_by_reference_for_update(
        conn: &mut PgConnection,
        reference: &str,
    ) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE reference = $1 FOR UPDATE NOWAIT")
            .bind(reference)
            .fetch_optional(conn)
            .await
            .map_err(|e| map_sqlx_error("Failed to lock booking", e))
    }

    /// Bind a seat to a booking inside a transaction.
    pub async fn bind_seat_in(
        conn: &mut PgConnection,
        reference: &str,
        seat_id: SeatId,
    ) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>(BIND_SEAT)
            .bind(reference)
            .bind(seat_id)
            .fetch_optional(conn)
            .await
            .map_err(|e| map_sqlx_error("Failed to bind seat", e))
    }

    /// Clear one booking's binding inside a transaction.
    pub async fn clear_binding(conn: &mut PgConnection, reference: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE bookings \
             SET seat_id = NULL, checked_in = FALSE, checked_in_at = NULL, updated_at = NOW() \
             WHERE reference = $1",
        )
        .bind(reference)
        .execute(conn)
        .await
        .map_err(|e| map_sqlx_error("Failed to clear booking", e))?;
        Ok(())
    }

    /// Clear every booking's binding. Returns rows changed.
    pub async fn clear_all(conn: &mut PgConnection) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE bookings \
             SET seat_id = NULL, checked_in = FALSE, checked_in_at = NULL, updated_at = NOW() \
             WHERE seat_id IS NOT NULL OR checked_in",
        )
        .execute(conn)
        .await
        .map_err(|e| map_sqlx_error("Failed to clear bookings", e))?;
        Ok(result.rows_affected())
    }
}
