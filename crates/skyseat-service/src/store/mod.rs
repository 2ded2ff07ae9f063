//! Storage seam consumed by the allocation engine.
//!
//! [`SeatStore`] is the shared, connection-pool level handle. It offers plain
//! reads and single-statement writes, and opens [`SeatTransaction`]s for the
//! work that must be all-or-nothing.
//!
//! Two implementations are provided:
//! - [`PgSeatStore`] on PostgreSQL (`FOR UPDATE SKIP LOCKED` row locks)
//! - [`MemorySeatStore`] in-process, with equivalent lock-skip semantics

pub mod memory;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;

use skyseat_core::result::AppResult;
use skyseat_core::types::{FlightId, SeatId};
use skyseat_entity::allocation::PoolStatus;
use skyseat_entity::booking::Booking;
use skyseat_entity::flight::Flight;
use skyseat_entity::seat::Seat;

pub use memory::MemorySeatStore;
pub use postgres::PgSeatStore;

/// Shared access to seats and the booking ledger.
///
/// Implementations must be thread-safe: one handle is used by every
/// concurrent allocation.
#[async_trait]
pub trait SeatStore: Send + Sync + fmt::Debug {
    /// Look up a booking by reservation code.
    async fn find_booking(&self, reference: &str) -> AppResult<Option<Booking>>;

    /// Load one seat.
    async fn find_seat(&self, seat_id: SeatId) -> AppResult<Option<Seat>>;

    /// Read up to `limit` available seats of a flight in allocation order.
    ///
    /// Plain read with no isolation from concurrent readers.
    async fn available_seats(&self, flight_id: FlightId, limit: u32) -> AppResult<Vec<Seat>>;

    /// Re-read the current availability of one seat.
    async fn is_seat_available(&self, seat_id: SeatId) -> AppResult<bool>;

    /// Flip a seat to unavailable if, and only if, it is still available.
    ///
    /// Returns `true` when this call performed the flip.
    async fn claim_seat_if_available(&self, seat_id: SeatId) -> AppResult<bool>;

    /// Bind a seat to a booking as a single statement.
    ///
    /// Returns `None` for an unknown reference. A seat bound to another
    /// booking fails with `ErrorKind::ConstraintViolation`.
    async fn bind_seat(&self, reference: &str, seat_id: SeatId) -> AppResult<Option<Booking>>;

    /// Open a transaction.
    async fn begin(&self) -> AppResult<Box<dyn SeatTransaction>>;

    /// List every flight by departure time.
    async fn list_flights(&self) -> AppResult<Vec<Flight>>;

    /// List every seat of a flight in allocation order.
    async fn list_seats(&self, flight_id: FlightId) -> AppResult<Vec<Seat>>;

    /// Seat counts for one flight.
    async fn pool_status(&self, flight_id: FlightId) -> AppResult<PoolStatus>;

    /// Check the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// One all-or-nothing unit of work.
///
/// Row locks taken through a transaction are held until it commits or rolls
/// back. Dropping a transaction without committing rolls it back.
#[async_trait]
pub trait SeatTransaction: Send {
    /// Look up a booking and lock its row without waiting.
    ///
    /// Fails with `ErrorKind::Conflict` if another transaction holds it.
    async fn find_booking_for_update(&mut self, reference: &str) -> AppResult<Option<Booking>>;

    /// Load one seat as seen by this transaction.
    async fn find_seat(&mut self, seat_id: SeatId) -> AppResult<Option<Seat>>;

    /// Select and exclusively lock the first available seat of a flight,
    /// skipping rows locked by other transactions. Never blocks.
    async fn lock_next_available(&mut self, flight_id: FlightId) -> AppResult<Option<Seat>>;

    /// Set one seat's availability flag unconditionally.
    async fn set_seat_available(&mut self, seat_id: SeatId, available: bool) -> AppResult<()>;

    /// Bind a seat to a booking. Same contract as [`SeatStore::bind_seat`].
    async fn bind_seat(&mut self, reference: &str, seat_id: SeatId) -> AppResult<Option<Booking>>;

    /// Clear one booking's binding.
    async fn clear_binding(&mut self, reference: &str) -> AppResult<()>;

    /// Mark every seat available. Returns the number of seats changed.
    async fn release_all_seats(&mut self) -> AppResult<u64>;

    /// Clear every booking's binding. Returns the number of bookings changed.
    async fn clear_all_bindings(&mut self) -> AppResult<u64>;

    /// Make every write of this transaction visible atomically.
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// Discard every write of this transaction and release its locks.
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}
