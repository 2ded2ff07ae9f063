//! Transactional allocation with skip-locked row selection.

use std::sync::Arc;

use tracing::{info, warn};

use skyseat_core::error::AppError;
use skyseat_core::result::AppResult;
use skyseat_core::types::FlightId;
use skyseat_entity::allocation::{AllocationPolicy, SeatAssignment};

use super::delay::ProcessingDelay;
use super::ledger::LedgerBinder;
use crate::store::{SeatStore, SeatTransaction};

/// Allocates inside one transaction holding an exclusive lock on the chosen
/// seat from selection to commit.
///
/// Seats locked by other in-flight transactions are skipped, never waited
/// on. At most one booking can ever be bound to a seat.
#[derive(Debug, Clone)]
pub struct SafePolicy {
    store: Arc<dyn SeatStore>,
    delay: ProcessingDelay,
}

impl SafePolicy {
    /// Creates the policy over a store handle.
    pub fn new(store: Arc<dyn SeatStore>, delay: ProcessingDelay) -> Self {
        Self { store, delay }
    }

    /// Attempt one allocation for `reference`.
    ///
    /// Any failure rolls the transaction back, leaving seats and bookings as
    /// they were.
    pub async fn allocate(
        &self,
        reference: &str,
        flight: Option<FlightId>,
    ) -> AppResult<SeatAssignment> {
        let mut tx = self.store.begin().await?;

        match self.run(tx.as_mut(), reference, flight).await {
            Ok(assignment) => {
                tx.commit().await?;
                if !assignment.already_assigned {
                    info!(
                        reference = %reference,
                        flight_id = %assignment.flight_id,
                        seat = %assignment.seat_number,
                        policy = "safe",
                        "Seat assigned"
                    );
                }
                Ok(assignment)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(
                        reference = %reference,
                        error = %rollback_err,
                        "Rollback after failed allocation also failed"
                    );
                }
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        tx: &mut dyn SeatTransaction,
        reference: &str,
        flight: Option<FlightId>,
    ) -> AppResult<SeatAssignment> {
        let booking = tx
            .find_booking_for_update(reference)
            .await?
            .ok_or_else(|| AppError::unknown_requester(reference))?;

        if let Some(seat_id) = booking.bound_seat() {
            let seat = tx
                .find_seat(seat_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Seat {seat_id} not found")))?;
            return Ok(SeatAssignment::existing(&booking, &seat, AllocationPolicy::Safe));
        }

        let flight_id = flight.unwrap_or(booking.flight_id);
        let seat = tx.lock_next_available(flight_id).await?.ok_or_else(|| {
            AppError::pool_exhausted(format!("No available seats on flight {flight_id}"))
        })?;

        self.delay.pause().await;

        tx.set_seat_available(seat.id, false).await?;
        let bound = LedgerBinder::bind_in(tx, reference, seat.id).await?;

        Ok(SeatAssignment::bound(&bound, &seat, AllocationPolicy::Safe))
    }
}
