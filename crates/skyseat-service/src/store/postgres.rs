//! PostgreSQL seat store.

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use skyseat_core::error::AppError;
use skyseat_core::result::AppResult;
use skyseat_core::types::{FlightId, SeatId};
use skyseat_database::DatabasePool;
use skyseat_database::map_sqlx_error;
use skyseat_database::repositories::{BookingRepository, FlightRepository, SeatRepository};
use skyseat_entity::allocation::PoolStatus;
use skyseat_entity::booking::Booking;
use skyseat_entity::flight::Flight;
use skyseat_entity::seat::Seat;

use super::{SeatStore, SeatTransaction};

/// Seat store backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgSeatStore {
    db: DatabasePool,
    flights: FlightRepository,
    seats: SeatRepository,
    bookings: BookingRepository,
}

impl PgSeatStore {
    /// Creates a store over the given pool.
    pub fn new(db: DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            flights: FlightRepository::new(pool.clone()),
            seats: SeatRepository::new(pool.clone()),
            bookings: BookingRepository::new(pool),
            db,
        }
    }
}

#[async_trait]
impl SeatStore for PgSeatStore {
    async fn find_booking(&self, reference: &str) -> AppResult<Option<Booking>> {
        self.bookings.find_by_reference(reference).await
    }

    async fn find_seat(&self, seat_id: SeatId) -> AppResult<Option<Seat>> {
        self.seats.find_by_id(seat_id).await
    }

    async fn available_seats(&self, flight_id: FlightId, limit: u32) -> AppResult<Vec<Seat>> {
        self.seats.find_available(flight_id, i64::from(limit)).await
    }

    async fn is_seat_available(&self, seat_id: SeatId) -> AppResult<bool> {
        self.seats
            .is_available(seat_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Seat {seat_id} not found")))
    }

    async fn claim_seat_if_available(&self, seat_id: SeatId) -> AppResult<bool> {
        self.seats.claim_if_available(seat_id).await
    }

    async fn bind_seat(&self, reference: &str, seat_id: SeatId) -> AppResult<Option<Booking>> {
        self.bookings.bind_seat(reference, seat_id).await
    }

    async fn begin(&self) -> AppResult<Box<dyn SeatTransaction>> {
        let tx = self
            .db
            .pool()
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Failed to begin transaction", e))?;
        Ok(Box::new(PgSeatTransaction { tx }))
    }

    async fn list_flights(&self) -> AppResult<Vec<Flight>> {
        self.flights.find_all().await
    }

    async fn list_seats(&self, flight_id: FlightId) -> AppResult<Vec<Seat>> {
        self.seats.find_by_flight(flight_id).await
    }

    async fn pool_status(&self, flight_id: FlightId) -> AppResult<PoolStatus> {
        let (total, available) = self.seats.count_by_flight(flight_id).await?;
        let total = total.max(0) as u64;
        let available = available.max(0) as u64;
        Ok(PoolStatus {
            flight_id,
            total,
            available,
            assigned: total.saturating_sub(available),
        })
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.db.health_check().await
    }
}

/// A PostgreSQL transaction. Dropping it uncommitted rolls back.
pub struct PgSeatTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl SeatTransaction for PgSeatTransaction {
    async fn find_booking_for_update(&mut self, reference: &str) -> AppResult<Option<Booking>> {
        BookingRepository::find_by_reference_for_update(&mut self.tx, reference).await
    }

    async fn find_seat(&mut self, seat_id: SeatId) -> AppResult<Option<Seat>> {
        SeatRepository::find_by_id_in(&mut self.tx, seat_id).await
    }

    async fn lock_next_available(&mut self, flight_id: FlightId) -> AppResult<Option<Seat>> {
        SeatRepository::lock_next_available(&mut self.tx, flight_id).await
    }

    async fn set_seat_available(&mut self, seat_id: SeatId, available: bool) -> AppResult<()> {
        SeatRepository::set_available(&mut self.tx, seat_id, available).await
    }

    async fn bind_seat(&mut self, reference: &str, seat_id: SeatId) -> AppResult<Option<Booking>> {
        BookingRepository::bind_seat_in(&mut self.tx, reference, seat_id).await
    }

    async fn clear_binding(&mut self, reference: &str) -> AppResult<()> {
        BookingRepository::clear_binding(&mut self.tx, reference).await
    }

    async fn release_all_seats(&mut self) -> AppResult<u64> {
        SeatRepository::release_all(&mut self.tx).await
    }

    async fn clear_all_bindings(&mut self) -> AppResult<u64> {
        BookingRepository::clear_all(&mut self.tx).await
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| map_sqlx_error("Failed to commit transaction", e))
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| map_sqlx_error("Failed to roll back transaction", e))
    }
}
