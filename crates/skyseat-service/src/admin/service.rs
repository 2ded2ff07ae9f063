//! Administrative operations over the seat pool.

use std::sync::Arc;

use tracing::{info, warn};

use skyseat_core::error::AppError;
use skyseat_core::result::AppResult;
use skyseat_core::types::{FlightId, SeatId};
use skyseat_entity::allocation::{PoolStatus, ResetSummary};
use skyseat_entity::flight::Flight;
use skyseat_entity::seat::Seat;

use crate::store::{SeatStore, SeatTransaction};

/// Administrative service over the seat store.
///
/// Reset is not coordinated with in-flight allocations. Callers serialize it
/// externally.
#[derive(Debug, Clone)]
pub struct AdminService {
    store: Arc<dyn SeatStore>,
}

impl AdminService {
    /// Creates a new admin service.
    pub fn new(store: Arc<dyn SeatStore>) -> Self {
        Self { store }
    }

    /// Make every seat available and clear every booking's binding, as one
    /// transaction.
    pub async fn reset(&self) -> AppResult<ResetSummary> {
        let mut tx = self.store.begin().await?;
        match Self::reset_in(tx.as_mut()).await {
            Ok(summary) => {
                tx.commit().await?;
                info!(
                    seats_released = summary.seats_released,
                    bookings_cleared = summary.bookings_cleared,
                    "Seat pools reset"
                );
                Ok(summary)
            }
            Err(e) => {
                rollback(tx, "reset").await;
                Err(e)
            }
        }
    }

    async fn reset_in(tx: &mut dyn SeatTransaction) -> AppResult<ResetSummary> {
        let seats_released = tx.release_all_seats().await?;
        let bookings_cleared = tx.clear_all_bindings().await?;
        Ok(ResetSummary {
            seats_released,
            bookings_cleared,
        })
    }

    /// Unbind a booking's seat and make the seat available again.
    ///
    /// Returns the released seat, or `None` if the booking held none.
    pub async fn release(&self, reference: &str) -> AppResult<Option<SeatId>> {
        let mut tx = self.store.begin().await?;
        match Self::release_in(tx.as_mut(), reference).await {
            Ok(Some(seat_id)) => {
                tx.commit().await?;
                info!(reference = %reference, seat_id = %seat_id, "Seat released");
                Ok(Some(seat_id))
            }
            Ok(None) => {
                rollback(tx, "release").await;
                Ok(None)
            }
            Err(e) => {
                rollback(tx, "release").await;
                Err(e)
            }
        }
    }

    async fn release_in(
        tx: &mut dyn SeatTransaction,
        reference: &str,
    ) -> AppResult<Option<SeatId>> {
        let booking = tx
            .find_booking_for_update(reference)
            .await?
            .ok_or_else(|| AppError::unknown_requester(reference))?;

        let Some(seat_id) = booking.seat_id else {
            return Ok(None);
        };

        tx.clear_binding(reference).await?;
        tx.set_seat_available(seat_id, true).await?;
        Ok(Some(seat_id))
    }

    /// Every flight, by departure time.
    pub async fn list_flights(&self) -> AppResult<Vec<Flight>> {
        self.store.list_flights().await
    }

    /// Seat counts for one flight.
    pub async fn pool_status(&self, flight_id: FlightId) -> AppResult<PoolStatus> {
        self.store.pool_status(flight_id).await
    }

    /// Every seat of a flight in allocation order.
    pub async fn list_seats(&self, flight_id: FlightId) -> AppResult<Vec<Seat>> {
        self.store.list_seats(flight_id).await
    }

    /// Whether the backing store is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        self.store.health_check().await
    }
}

async fn rollback(tx: Box<dyn SeatTransaction>, operation: &str) {
    if let Err(e) = tx.rollback().await {
        warn!(operation, error = %e, "Rollback failed");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use skyseat_core::config::AllocationConfig;
    use skyseat_core::error::ErrorKind;

    use super::*;
    use crate::allocation::{AllocationService, ProcessingDelay};
    use crate::store::MemorySeatStore;

    fn setup(seats: &[&str], references: &[&str]) -> (MemorySeatStore, FlightId) {
        let store = MemorySeatStore::new();
        let flight = store.seed_flight(seats).unwrap();
        for reference in references {
            store.seed_booking(reference, flight).unwrap();
        }
        (store, flight)
    }

    fn allocator(store: &MemorySeatStore) -> AllocationService {
        AllocationService::with_delay(
            Arc::new(store.clone()),
            &AllocationConfig::default(),
            ProcessingDelay::none(),
        )
    }

    #[tokio::test]
    async fn test_reset_restores_every_seat_and_binding() {
        let (store, flight) = setup(&["1A", "1B", "1C"], &["AAA111", "BBB222"]);
        let allocator = allocator(&store);
        allocator.allocate_safe("AAA111", None).await.unwrap();
        allocator.allocate_unsafe("BBB222", None).await.unwrap();

        let admin = AdminService::new(Arc::new(store.clone()));
        let summary = admin.reset().await.unwrap();
        assert_eq!(
            summary,
            ResetSummary {
                seats_released: 2,
                bookings_cleared: 2
            }
        );

        let status = admin.pool_status(flight).await.unwrap();
        assert_eq!(status.available, status.total);
        assert_eq!(status.assigned, 0);
        for booking in store.bookings().unwrap() {
            assert_eq!(booking.seat_id, None);
            assert!(!booking.checked_in);
        }
    }

    #[tokio::test]
    async fn test_reset_on_clean_pool_changes_nothing() {
        let (store, _) = setup(&["1A"], &["AAA111"]);
        let summary = AdminService::new(Arc::new(store)).reset().await.unwrap();
        assert_eq!(summary, ResetSummary::default());
    }

    #[tokio::test]
    async fn test_release_frees_seat_for_next_booking() {
        let (store, flight) = setup(&["1A"], &["AAA111", "BBB222"]);
        let allocator = allocator(&store);
        let admin = AdminService::new(Arc::new(store.clone()));
        let first = allocator.allocate_safe("AAA111", None).await.unwrap();

        let released = admin.release("AAA111").await.unwrap();
        assert_eq!(released, Some(first.seat_id));
        assert_eq!(admin.pool_status(flight).await.unwrap().available, 1);

        let second = allocator.allocate_safe("BBB222", None).await.unwrap();
        assert_eq!(second.seat_id, first.seat_id);
    }

    #[tokio::test]
    async fn test_release_unbound_and_unknown() {
        let (store, _) = setup(&["1A"], &["AAA111"]);
        let admin = AdminService::new(Arc::new(store.clone()));

        assert_eq!(admin.release("AAA111").await.unwrap(), None);
        let err = admin.release("GHOST1").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownRequester);
        assert_eq!(store.held_locks().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_seats_in_allocation_order() {
        let (store, flight) = setup(&["1A", "1B", "2A"], &[]);
        let seats = AdminService::new(Arc::new(store))
            .list_seats(flight)
            .await
            .unwrap();
        let labels: Vec<&str> = seats.iter().map(|s| s.seat_number.as_str()).collect();
        assert_eq!(labels, vec!["1A", "1B", "2A"]);
    }

    #[tokio::test]
    async fn test_list_flights_includes_seeded_flights() {
        let store = MemorySeatStore::new();
        let first = store.seed_flight(&["1A"]).unwrap();
        let second = store.seed_flight(&["1A", "1B"]).unwrap();
        let flights = AdminService::new(Arc::new(store)).list_flights().await.unwrap();
        let ids: Vec<_> = flights.iter().map(|f| f.id).collect();
        assert_eq!(flights.len(), 2);
        assert!(ids.contains(&first) && ids.contains(&second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_release_waits_for_no_one() {
        let (store, _) = setup(&["1A"], &["AAA111"]);
        let allocator = allocator(&store);
        allocator.allocate_safe("AAA111", None).await.unwrap();

        let mut holder = store.begin().await.unwrap();
        holder.find_booking_for_update("AAA111").await.unwrap();

        let admin = AdminService::new(Arc::new(store.clone()));
        let err = tokio::time::timeout(Duration::from_secs(1), admin.release("AAA111"))
            .await
            .expect("release must not block on a locked booking")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        holder.rollback().await.unwrap();
    }
}
