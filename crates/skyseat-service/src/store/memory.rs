//! In-process seat store for single-node use and tests.
//!
//! Committed rows live behind one `std::sync::Mutex`. A transaction keeps a
//! log of pending writes and only applies them to the committed tables on
//! commit, so other callers never observe partial state. Row locks are
//! tracked per transaction id: [`SeatTransaction::lock_next_available`]
//! skips seats locked by someone else, and booking locks fail fast with
//! `ErrorKind::Conflict`, mirroring `SKIP LOCKED` and `NOWAIT`.
//!
//! Locks are exclusive against writes. A write to a row locked by another
//! transaction, or a binding of a seat another open transaction has bound,
//! waits until that transaction commits or rolls back and is then evaluated
//! against the committed state, as an `UPDATE` does in PostgreSQL.
//!
//! Every call yields to the scheduler before touching state, so concurrent
//! tasks interleave between store calls the way they would around real I/O.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::Notify;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use skyseat_core::error::AppError;
use skyseat_core::result::AppResult;
use skyseat_core::types::{BookingId, FlightId, PassengerId, SeatId};
use skyseat_entity::allocation::PoolStatus;
use skyseat_entity::booking::Booking;
use skyseat_entity::flight::Flight;
use skyseat_entity::seat::{Seat, SeatClass};

use super::{SeatStore, SeatTransaction};

type TxId = u64;

/// Committed rows.
#[derive(Debug, Clone, Default)]
struct Tables {
    flights: HashMap<FlightId, Flight>,
    seats: HashMap<SeatId, Seat>,
    bookings: HashMap<String, Booking>,
}

impl Tables {
    fn seats_in_order(&self, flight_id: FlightId) -> Vec<&Seat> {
        let mut seats: Vec<&Seat> = self
            .seats
            .values()
            .filter(|s| s.flight_id == flight_id)
            .collect();
        seats.sort_by(|a, b| a.ordering_key().cmp(&b.ordering_key()));
        seats
    }

    fn set_available(&mut self, seat_id: SeatId, available: bool) -> u64 {
        match self.seats.get_mut(&seat_id) {
            Some(seat) => {
                seat.is_available = available;
                seat.updated_at = Utc::now();
                1
            }
            None => 0,
        }
    }

    fn bind(&mut self, reference: &str, seat_id: SeatId) -> AppResult<Option<Booking>> {
        if !self.bookings.contains_key(reference) {
            return Ok(None);
        }
        if !self.seats.contains_key(&seat_id) {
            return Err(AppError::database(format!(
                "insert or update on table \"bookings\" violates foreign key constraint: seat {seat_id} does not exist"
            )));
        }
        let taken = self
            .bookings
            .values()
            .any(|b| b.seat_id == Some(seat_id) && b.reference != reference);
        if taken {
            return Err(AppError::constraint_violation(format!(
                "duplicate key value violates unique constraint \"bookings_seat_id_key\": seat {seat_id} is already bound"
            )));
        }

        let now = Utc::now();
        let booking = self
            .bookings
            .get_mut(reference)
            .ok_or_else(|| AppError::internal("booking vanished during bind"))?;
        booking.seat_id = Some(seat_id);
        booking.checked_in = true;
        booking.checked_in_at = Some(now);
        booking.updated_at = now;
        Ok(Some(booking.clone()))
    }

    fn clear(booking: &mut Booking) -> bool {
        if booking.seat_id.is_none() && !booking.checked_in {
            return false;
        }
        booking.seat_id = None;
        booking.checked_in = false;
        booking.checked_in_at = None;
        booking.updated_at = Utc::now();
        true
    }

    fn clear_binding(&mut self, reference: &str) {
        if let Some(booking) = self.bookings.get_mut(reference) {
            Self::clear(booking);
        }
    }

    fn release_all(&mut self) -> u64 {
        let now = Utc::now();
        let mut changed = 0;
        for seat in self.seats.values_mut().filter(|s| !s.is_available) {
            seat.is_available = true;
            seat.updated_at = now;
            changed += 1;
        }
        changed
    }

    fn clear_all(&mut self) -> u64 {
        self.bookings
            .values_mut()
            .map(Self::clear)
            .filter(|changed| *changed)
            .count() as u64
    }
}

/// A write recorded by a transaction, replayed on commit.
#[derive(Debug, Clone)]
enum PendingWrite {
    SetAvailable { seat_id: SeatId, available: bool },
    Bind { reference: String, seat_id: SeatId },
    Clear { reference: String },
    ReleaseAll,
    ClearAll,
}

impl PendingWrite {
    fn apply(&self, tables: &mut Tables) -> AppResult<()> {
        match self {
            Self::SetAvailable { seat_id, available } => {
                tables.set_available(*seat_id, *available);
            }
            Self::Bind { reference, seat_id } => {
                tables.bind(reference, *seat_id)?;
            }
            Self::Clear { reference } => tables.clear_binding(reference),
            Self::ReleaseAll => {
                tables.release_all();
            }
            Self::ClearAll => {
                tables.clear_all();
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    tables: Tables,
    seat_locks: HashMap<SeatId, TxId>,
    booking_locks: HashMap<String, TxId>,
    /// Seats bound to a booking by a transaction that has not finished yet.
    seat_keys: HashMap<SeatId, TxId>,
    next_tx: TxId,
}

impl MemoryState {
    fn release_locks(&mut self, tx: TxId) {
        self.seat_locks.retain(|_, owner| *owner != tx);
        self.booking_locks.retain(|_, owner| *owner != tx);
        self.seat_keys.retain(|_, owner| *owner != tx);
    }

    fn seat_locked_by_other(&self, seat_id: SeatId, me: Option<TxId>) -> bool {
        self.seat_locks
            .get(&seat_id)
            .is_some_and(|owner| Some(*owner) != me)
    }

    fn booking_locked_by_other(&self, reference: &str, me: Option<TxId>) -> bool {
        self.booking_locks
            .get(reference)
            .is_some_and(|owner| Some(*owner) != me)
    }

    fn seat_bound_by_other(&self, seat_id: SeatId, me: Option<TxId>) -> bool {
        self.seat_keys
            .get(&seat_id)
            .is_some_and(|owner| Some(*owner) != me)
    }
}

/// In-memory seat store.
///
/// Suitable for single-node deployments and tests. Cloning shares state.
#[derive(Debug, Clone, Default)]
pub struct MemorySeatStore {
    state: Arc<Mutex<MemoryState>>,
    released: Arc<Notify>,
}

fn lock_state(state: &Mutex<MemoryState>) -> AppResult<MutexGuard<'_, MemoryState>> {
    state
        .lock()
        .map_err(|_| AppError::internal("memory seat store lock poisoned"))
}

/// Runs `attempt` against the shared state. While it returns `None` (the row
/// is held by another transaction) waits for the next lock release and
/// retries.
async fn when_unlocked<T>(
    state: &Mutex<MemoryState>,
    released: &Notify,
    mut attempt: impl FnMut(&mut MemoryState) -> Option<AppResult<T>>,
) -> AppResult<T> {
    loop {
        let notified = released.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        let outcome = {
            let mut guard = lock_state(state)?;
            attempt(&mut guard)
        };
        match outcome {
            Some(result) => return result,
            None => notified.await,
        }
    }
}

impl MemorySeatStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a seat row.
    pub fn insert_seat(&self, seat: Seat) -> AppResult<()> {
        let mut state = lock_state(&self.state)?;
        state.tables.seats.insert(seat.id, seat);
        Ok(())
    }

    /// Insert or replace a booking row.
    pub fn insert_booking(&self, booking: Booking) -> AppResult<()> {
        let mut state = lock_state(&self.state)?;
        state
            .tables
            .bookings
            .insert(booking.reference.clone(), booking);
        Ok(())
    }

    /// Insert or replace a flight row.
    pub fn insert_flight(&self, flight: Flight) -> AppResult<()> {
        let mut state = lock_state(&self.state)?;
        state.tables.flights.insert(flight.id, flight);
        Ok(())
    }

    /// Provision a flight with economy seats labelled by `seat_numbers`.
    ///
    /// Seats are positioned in the order given, starting at 1.
    pub fn seed_flight(&self, seat_numbers: &[&str]) -> AppResult<FlightId> {
        let flight_id = FlightId::new();
        let number = lock_state(&self.state)?.tables.flights.len() + 1;
        self.insert_flight(Flight {
            id: flight_id,
            flight_number: format!("SK{number:04}"),
            origin: "CPH".to_string(),
            destination: "ARN".to_string(),
            departs_at: Utc::now(),
        })?;
        for (index, number) in seat_numbers.iter().enumerate() {
            self.insert_seat(Seat {
                id: SeatId::new(),
                flight_id,
                seat_number: (*number).to_string(),
                position: index as i32 + 1,
                seat_class: SeatClass::Economy,
                price_cents: 0,
                is_available: true,
                updated_at: Utc::now(),
            })?;
        }
        Ok(flight_id)
    }

    /// Provision an unbound booking on a flight.
    pub fn seed_booking(&self, reference: &str, flight_id: FlightId) -> AppResult<Booking> {
        let booking = Booking {
            id: BookingId::new(),
            reference: reference.to_string(),
            passenger_id: PassengerId::new(),
            flight_id,
            seat_id: None,
            checked_in: false,
            checked_in_at: None,
            updated_at: Utc::now(),
        };
        self.insert_booking(booking.clone())?;
        Ok(booking)
    }

    /// Committed bookings, sorted by reference.
    pub fn bookings(&self) -> AppResult<Vec<Booking>> {
        let state = lock_state(&self.state)?;
        let mut bookings: Vec<Booking> = state.tables.bookings.values().cloned().collect();
        bookings.sort_by(|a, b| a.reference.cmp(&b.reference));
        Ok(bookings)
    }

    /// Find a seat id by its label on a flight.
    pub fn seat_id(&self, flight_id: FlightId, seat_number: &str) -> AppResult<Option<SeatId>> {
        let state = lock_state(&self.state)?;
        Ok(state
            .tables
            .seats
            .values()
            .find(|s| s.flight_id == flight_id && s.seat_number == seat_number)
            .map(|s| s.id))
    }

    /// Number of row locks currently held by open transactions.
    pub fn held_locks(&self) -> AppResult<usize> {
        let state = lock_state(&self.state)?;
        Ok(state.seat_locks.len() + state.booking_locks.len() + state.seat_keys.len())
    }
}

#[async_trait]
impl SeatStore for MemorySeatStore {
    async fn find_booking(&self, reference: &str) -> AppResult<Option<Booking>> {
        tokio::task::yield_now().await;
        let state = lock_state(&self.state)?;
        Ok(state.tables.bookings.get(reference).cloned())
    }

    async fn find_seat(&self, seat_id: SeatId) -> AppResult<Option<Seat>> {
        tokio::task::yield_now().await;
        let state = lock_state(&self.state)?;
        Ok(state.tables.seats.get(&seat_id).cloned())
    }

    async fn available_seats(&self, flight_id: FlightId, limit: u32) -> AppResult<Vec<Seat>> {
        tokio::task::yield_now().await;
        let state = lock_state(&self.state)?;
        Ok(state
            .tables
            .seats_in_order(flight_id)
            .into_iter()
            .filter(|s| s.is_available)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn is_seat_available(&self, seat_id: SeatId) -> AppResult<bool> {
        tokio::task::yield_now().await;
        let state = lock_state(&self.state)?;
        state
            .tables
            .seats
            .get(&seat_id)
            .map(|s| s.is_available)
            .ok_or_else(|| AppError::not_found(format!("Seat {seat_id} not found")))
    }

    async fn claim_seat_if_available(&self, seat_id: SeatId) -> AppResult<bool> {
        tokio::task::yield_now().await;
        when_unlocked(&self.state, &self.released, |state| {
            if state.seat_locked_by_other(seat_id, None) {
                return None;
            }
            let available = state
                .tables
                .seats
                .get(&seat_id)
                .is_some_and(|s| s.is_available);
            Some(Ok(available && state.tables.set_available(seat_id, false) == 1))
        })
        .await
    }

    async fn bind_seat(&self, reference: &str, seat_id: SeatId) -> AppResult<Option<Booking>> {
        tokio::task::yield_now().await;
        when_unlocked(&self.state, &self.released, |state| {
            if state.booking_locked_by_other(reference, None)
                || state.seat_bound_by_other(seat_id, None)
            {
                return None;
            }
            Some(state.tables.bind(reference, seat_id))
        })
        .await
    }

    async fn begin(&self) -> AppResult<Box<dyn SeatTransaction>> {
        tokio::task::yield_now().await;
        let mut state = lock_state(&self.state)?;
        state.next_tx += 1;
        let id = state.next_tx;
        debug!(tx = id, "Memory transaction started");
        Ok(Box::new(MemorySeatTransaction {
            id,
            state: Arc::clone(&self.state),
            released: Arc::clone(&self.released),
            pending: Vec::new(),
            finished: false,
        }))
    }

    async fn list_flights(&self) -> AppResult<Vec<Flight>> {
        tokio::task::yield_now().await;
        let state = lock_state(&self.state)?;
        let mut flights: Vec<Flight> = state.tables.flights.values().cloned().collect();
        flights.sort_by(|a, b| {
            (a.departs_at, &a.flight_number).cmp(&(b.departs_at, &b.flight_number))
        });
        Ok(flights)
    }

    async fn list_seats(&self, flight_id: FlightId) -> AppResult<Vec<Seat>> {
        tokio::task::yield_now().await;
        let state = lock_state(&self.state)?;
        Ok(state
            .tables
            .seats_in_order(flight_id)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn pool_status(&self, flight_id: FlightId) -> AppResult<PoolStatus> {
        tokio::task::yield_now().await;
        let state = lock_state(&self.state)?;
        let seats = state.tables.seats_in_order(flight_id);
        let total = seats.len() as u64;
        let available = seats.iter().filter(|s| s.is_available).count() as u64;
        Ok(PoolStatus {
            flight_id,
            total,
            available,
            assigned: total - available,
        })
    }

    async fn health_check(&self) -> AppResult<bool> {
        lock_state(&self.state).map(|_| true)
    }
}

/// A transaction over [`MemorySeatStore`].
#[derive(Debug)]
pub struct MemorySeatTransaction {
    id: TxId,
    state: Arc<Mutex<MemoryState>>,
    released: Arc<Notify>,
    pending: Vec<PendingWrite>,
    finished: bool,
}

impl MemorySeatTransaction {
    /// Committed tables with this transaction's pending writes applied.
    fn view(&self, state: &MemoryState) -> AppResult<Tables> {
        let mut tables = state.tables.clone();
        for write in &self.pending {
            write.apply(&mut tables)?;
        }
        Ok(tables)
    }

    fn record(&mut self, write: PendingWrite) {
        self.pending.push(write);
    }

    /// Drops every lock this transaction holds and wakes blocked writers.
    fn finish(&mut self, state: &mut MemoryState) {
        state.release_locks(self.id);
        self.finished = true;
        self.released.notify_waiters();
    }
}

#[async_trait]
impl SeatTransaction for MemorySeatTransaction {
    async fn find_booking_for_update(&mut self, reference: &str) -> AppResult<Option<Booking>> {
        tokio::task::yield_now().await;
        let mut state = lock_state(&self.state)?;
        let view = self.view(&state)?;
        let Some(booking) = view.bookings.get(reference).cloned() else {
            return Ok(None);
        };
        match state.booking_locks.get(reference) {
            Some(owner) if *owner != self.id => Err(AppError::conflict(format!(
                "could not obtain lock on booking '{reference}'"
            ))),
            _ => {
                state.booking_locks.insert(reference.to_string(), self.id);
                Ok(Some(booking))
            }
        }
    }

    async fn find_seat(&mut self, seat_id: SeatId) -> AppResult<Option<Seat>> {
        tokio::task::yield_now().await;
        let state = lock_state(&self.state)?;
        let mut view = self.view(&state)?;
        Ok(view.seats.remove(&seat_id))
    }

    async fn lock_next_available(&mut self, flight_id: FlightId) -> AppResult<Option<Seat>> {
        tokio::task::yield_now().await;
        let mut state = lock_state(&self.state)?;
        let view = self.view(&state)?;
        let next = view
            .seats_in_order(flight_id)
            .into_iter()
            .filter(|s| s.is_available)
            .find(|s| match state.seat_locks.get(&s.id) {
                Some(owner) => *owner == self.id,
                None => true,
            })
            .cloned();

        if let Some(seat) = &next {
            state.seat_locks.insert(seat.id, self.id);
            debug!(tx = self.id, seat = %seat.seat_number, "Seat row locked");
        }
        Ok(next)
    }

    async fn set_seat_available(&mut self, seat_id: SeatId, available: bool) -> AppResult<()> {
        tokio::task::yield_now().await;
        let id = self.id;
        when_unlocked(&self.state, &self.released, |state| {
            if state.seat_locked_by_other(seat_id, Some(id)) {
                return None;
            }
            state.seat_locks.insert(seat_id, id);
            Some(Ok(()))
        })
        .await?;
        self.record(PendingWrite::SetAvailable { seat_id, available });
        Ok(())
    }

    async fn bind_seat(&mut self, reference: &str, seat_id: SeatId) -> AppResult<Option<Booking>> {
        tokio::task::yield_now().await;
        let id = self.id;
        let this = &*self;
        let bound = when_unlocked(&this.state, &this.released, |state| {
            if state.booking_locked_by_other(reference, Some(id))
                || state.seat_bound_by_other(seat_id, Some(id))
            {
                return None;
            }
            let bound = match this.view(state).and_then(|mut view| view.bind(reference, seat_id)) {
                Ok(bound) => bound,
                Err(e) => return Some(Err(e)),
            };
            if bound.is_some() {
                state.booking_locks.insert(reference.to_string(), id);
                state.seat_keys.insert(seat_id, id);
            }
            Some(Ok(bound))
        })
        .await?;

        if bound.is_some() {
            self.record(PendingWrite::Bind {
                reference: reference.to_string(),
                seat_id,
            });
        }
        Ok(bound)
    }

    async fn clear_binding(&mut self, reference: &str) -> AppResult<()> {
        tokio::task::yield_now().await;
        let id = self.id;
        when_unlocked(&self.state, &self.released, |state| {
            if state.booking_locked_by_other(reference, Some(id)) {
                return None;
            }
            state.booking_locks.insert(reference.to_string(), id);
            Some(Ok(()))
        })
        .await?;
        self.record(PendingWrite::Clear {
            reference: reference.to_string(),
        });
        Ok(())
    }

    async fn release_all_seats(&mut self) -> AppResult<u64> {
        tokio::task::yield_now().await;
        let state = lock_state(&self.state)?;
        let changed = self.view(&state)?.release_all();
        drop(state);
        self.record(PendingWrite::ReleaseAll);
        Ok(changed)
    }

    async fn clear_all_bindings(&mut self) -> AppResult<u64> {
        tokio::task::yield_now().await;
        let state = lock_state(&self.state)?;
        let changed = self.view(&state)?.clear_all();
        drop(state);
        self.record(PendingWrite::ClearAll);
        Ok(changed)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        tokio::task::yield_now().await;
        let mut this = self;
        let shared = Arc::clone(&this.state);
        let mut state = lock_state(&shared)?;
        let result = this.view(&state);
        this.finish(&mut state);
        state.tables = result?;
        debug!(tx = this.id, writes = this.pending.len(), "Memory transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        let mut this = self;
        let shared = Arc::clone(&this.state);
        let mut state = lock_state(&shared)?;
        this.finish(&mut state);
        debug!(tx = this.id, "Memory transaction rolled back");
        Ok(())
    }
}

impl Drop for MemorySeatTransaction {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let shared = Arc::clone(&self.state);
        if let Ok(mut state) = shared.lock() {
            self.finish(&mut state);
            debug!(tx = self.id, "Memory transaction dropped without commit, rolled back");
        }
    }
}
