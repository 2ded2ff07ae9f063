//! Read-then-write allocation with no isolation between the steps.

use std::sync::Arc;

use tracing::{debug, info};

use skyseat_core::error::AppError;
use skyseat_core::result::AppResult;
use skyseat_core::types::FlightId;
use skyseat_entity::allocation::{AllocationPolicy, SeatAssignment};

use super::delay::ProcessingDelay;
use super::ledger::LedgerBinder;
use crate::store::SeatStore;

/// Allocates by reading a window of candidates, pausing, re-checking, then
/// writing.
///
/// Nothing holds a lock across the pause, so two callers can both see the
/// same seat as free. The conditional claim narrows the race; the ledger's
/// unique seat constraint is what finally rejects a second binding.
///
/// The claim and the binding are separate writes. If the call fails or hits
/// the deadline between them, the seat stays unavailable with no booking
/// bound to it until the next reset.
#[derive(Debug, Clone)]
pub struct UnsafePolicy {
    store: Arc<dyn SeatStore>,
    delay: ProcessingDelay,
    window: u32,
}

impl UnsafePolicy {
    /// Creates the policy over a store handle.
    pub fn new(store: Arc<dyn SeatStore>, delay: ProcessingDelay, window: u32) -> Self {
        Self {
            store,
            delay,
            window: window.max(1),
        }
    }

    /// Attempt one allocation for `reference`.
    pub async fn allocate(
        &self,
        reference: &str,
        flight: Option<FlightId>,
    ) -> AppResult<SeatAssignment> {
        let booking = self
            .store
            .find_booking(reference)
            .await?
            .ok_or_else(|| AppError::unknown_requester(reference))?;

        if let Some(seat_id) = booking.bound_seat() {
            let seat = self
                .store
                .find_seat(seat_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Seat {seat_id} not found")))?;
            return Ok(SeatAssignment::existing(&booking, &seat, AllocationPolicy::Unsafe));
        }

        let flight_id = flight.unwrap_or(booking.flight_id);
        let candidates = self.store.available_seats(flight_id, self.window).await?;
        if candidates.is_empty() {
            return Err(AppError::pool_exhausted(format!(
                "No available seats on flight {flight_id}"
            )));
        }

        for candidate in &candidates {
            self.delay.pause().await;

            if !self.store.is_seat_available(candidate.id).await? {
                debug!(
                    reference = %reference,
                    seat = %candidate.seat_number,
                    "Candidate taken since read, trying next"
                );
                continue;
            }

            let claimed = self.store.claim_seat_if_available(candidate.id).await?;
            if !claimed {
                debug!(
                    reference = %reference,
                    seat = %candidate.seat_number,
                    "Conditional claim matched no row"
                );
            }

            let bound = LedgerBinder::bind(self.store.as_ref(), reference, candidate.id).await?;
            info!(
                reference = %reference,
                flight_id = %flight_id,
                seat = %candidate.seat_number,
                policy = "unsafe",
                "Seat assigned"
            );
            return Ok(SeatAssignment::bound(&bound, candidate, AllocationPolicy::Unsafe));
        }

        Err(AppError::exhausted_candidates(format!(
            "All {} candidate seats were taken by concurrent requests",
            candidates.len()
        )))
    }
}
