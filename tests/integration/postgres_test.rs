//! Allocation tests against a real PostgreSQL database.
//!
//! These run only when `SKYSEAT_TEST_DATABASE_URL` points at a disposable
//! database; otherwise each test returns immediately. Every test provisions
//! its own flight so tests can run in parallel. None of them call the global
//! reset.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use uuid::Uuid;

use skyseat_core::config::{AllocationConfig, DatabaseConfig};
use skyseat_core::error::ErrorKind;
use skyseat_core::types::FlightId;
use skyseat_database::DatabasePool;
use skyseat_service::{
    AdminService, AllocationService, PgSeatStore, SeatStore, SeatTransaction,
};

const DATABASE_URL_VAR: &str = "SKYSEAT_TEST_DATABASE_URL";

struct Fixture {
    pool: PgPool,
    store: Arc<PgSeatStore>,
    flight_id: FlightId,
    references: Vec<String>,
}

async fn fixture(seats: usize, bookings: usize) -> Option<Fixture> {
    let url = std::env::var(DATABASE_URL_VAR).ok()?;
    let db = DatabasePool::connect(&DatabaseConfig::with_url(url))
        .await
        .expect("Failed to connect to test database");
    db.migrate().await.expect("Failed to run migrations");
    let pool = db.pool().clone();

    let flight_id = Uuid::now_v7();
    let tag = flight_id.simple().to_string();
    sqlx::query(
        "INSERT INTO flights (id, flight_number, origin, destination, departs_at) \
         VALUES ($1, $2, 'LHR', 'JFK', NOW() + INTERVAL '1 day')",
    )
    .bind(flight_id)
    .bind(format!("TS{}", &tag[tag.len() - 10..]))
    .execute(&pool)
    .await
    .expect("Failed to insert flight");

    for position in 1..=seats {
        sqlx::query(
            "INSERT INTO seats (id, flight_id, seat_number, position) VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::now_v7())
        .bind(flight_id)
        .bind(format!("{position}A"))
        .bind(position as i32)
        .execute(&pool)
        .await
        .expect("Failed to insert seat");
    }

    let mut references = Vec::with_capacity(bookings);
    for i in 0..bookings {
        let passenger_id = Uuid::now_v7();
        sqlx::query("INSERT INTO passengers (id, first_name, last_name) VALUES ($1, 'Test', $2)")
            .bind(passenger_id)
            .bind(format!("Passenger{i}"))
            .execute(&pool)
            .await
            .expect("Failed to insert passenger");

        let reference = format!("{}{i:03}", &tag[tag.len() - 8..]).to_uppercase();
        sqlx::query(
            "INSERT INTO bookings (id, reference, passenger_id, flight_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::now_v7())
        .bind(&reference)
        .bind(passenger_id)
        .bind(flight_id)
        .execute(&pool)
        .await
        .expect("Failed to insert booking");
        references.push(reference);
    }

    Some(Fixture {
        store: Arc::new(PgSeatStore::new(DatabasePool::from_pool(pool.clone()))),
        pool,
        flight_id: FlightId::from(flight_id),
        references,
    })
}

fn allocation(delay_ms: u64) -> AllocationConfig {
    AllocationConfig {
        processing_delay_min_ms: delay_ms,
        processing_delay_max_ms: delay_ms,
        ..AllocationConfig::default()
    }
}

async fn bound_seats(pool: &PgPool, flight_id: FlightId) -> Vec<Uuid> {
    sqlx::query_scalar::<_, Uuid>(
        "SELECT seat_id FROM bookings WHERE flight_id = $1 AND seat_id IS NOT NULL",
    )
    .bind(flight_id)
    .fetch_all(pool)
    .await
    .expect("Failed to read bindings")
}

#[tokio::test]
async fn test_position_ties_order_by_label_bytes() {
    let Some(fx) = fixture(0, 0).await else {
        return;
    };
    for label in ["b1", "a1", "B1"] {
        sqlx::query(
            "INSERT INTO seats (id, flight_id, seat_number, position) VALUES ($1, $2, $3, 1)",
        )
        .bind(Uuid::now_v7())
        .bind(fx.flight_id)
        .bind(label)
        .execute(&fx.pool)
        .await
        .expect("Failed to insert seat");
    }

    let seats = fx.store.list_seats(fx.flight_id).await.unwrap();
    let labels: Vec<&str> = seats.iter().map(|s| s.seat_number.as_str()).collect();
    assert_eq!(labels, vec!["B1", "a1", "b1"]);

    let mut tx = fx.store.begin().await.unwrap();
    let first = tx.lock_next_available(fx.flight_id).await.unwrap().unwrap();
    assert_eq!(first.seat_number, "B1");
    tx.rollback().await.unwrap();
}

#[tokio::test]
async fn test_health_check_sees_ledger_schema() {
    let Some(fx) = fixture(1, 0).await else {
        return;
    };
    assert!(fx.store.health_check().await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_safe_policy_under_contention() {
    let Some(fx) = fixture(4, 10).await else {
        return;
    };
    let service = Arc::new(AllocationService::new(fx.store.clone(), &allocation(20)));

    let handles: Vec<_> = fx
        .references
        .iter()
        .cloned()
        .map(|reference| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.allocate_safe(&reference, None).await })
        })
        .collect();

    let mut won = Vec::new();
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(assignment) => won.push(assignment.seat_id),
            Err(e) => assert_eq!(e.kind, ErrorKind::PoolExhausted, "{e}"),
        }
    }

    let distinct: HashSet<_> = won.iter().collect();
    assert_eq!(won.len(), 4);
    assert_eq!(distinct.len(), 4);
    assert_eq!(bound_seats(&fx.pool, fx.flight_id).await.len(), 4);

    let status = fx.store.pool_status(fx.flight_id).await.unwrap();
    assert_eq!((status.total, status.available, status.assigned), (4, 0, 4));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_unsafe_policy_is_stopped_by_ledger_constraint() {
    let Some(fx) = fixture(10, 8).await else {
        return;
    };
    let service = Arc::new(AllocationService::new(fx.store.clone(), &allocation(50)));

    let handles: Vec<_> = fx
        .references
        .iter()
        .cloned()
        .map(|reference| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.allocate_unsafe(&reference, None).await })
        })
        .collect();

    let mut won = 0;
    let mut collided = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(_) => won += 1,
            Err(e) => {
                assert!(
                    matches!(
                        e.kind,
                        ErrorKind::ConstraintViolation | ErrorKind::ExhaustedCandidates
                    ),
                    "{e}"
                );
                collided += 1;
            }
        }
    }

    assert!(collided > 0, "unsafe allocations never collided");
    let bound = bound_seats(&fx.pool, fx.flight_id).await;
    let distinct: HashSet<_> = bound.iter().collect();
    assert_eq!(bound.len(), won);
    assert_eq!(distinct.len(), won);
}

#[tokio::test]
async fn test_sequential_safe_allocations_fill_in_order() {
    let Some(fx) = fixture(3, 3).await else {
        return;
    };
    let service = AllocationService::new(fx.store.clone(), &AllocationConfig::without_delay());

    let mut seats = Vec::new();
    for reference in &fx.references {
        seats.push(service.allocate_safe(reference, None).await.unwrap().seat_number);
    }
    assert_eq!(seats, vec!["1A", "2A", "3A"]);
}

#[tokio::test]
async fn test_skip_locked_passes_over_held_row() {
    let Some(fx) = fixture(2, 1).await else {
        return;
    };
    let mut holder = fx.store.begin().await.unwrap();
    let held = holder.lock_next_available(fx.flight_id).await.unwrap().unwrap();
    assert_eq!(held.seat_number, "1A");

    let service = AllocationService::new(fx.store.clone(), &AllocationConfig::without_delay());
    let assignment = service.allocate_safe(&fx.references[0], None).await.unwrap();
    assert_eq!(assignment.seat_number, "2A");

    holder.rollback().await.unwrap();
}

#[tokio::test]
async fn test_ledger_rejects_second_binding() {
    let Some(fx) = fixture(1, 2).await else {
        return;
    };
    let seat = fx.store.list_seats(fx.flight_id).await.unwrap()[0].id;

    fx.store.bind_seat(&fx.references[0], seat).await.unwrap();
    let err = fx
        .store
        .bind_seat(&fx.references[1], seat)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ConstraintViolation);
}

#[tokio::test]
async fn test_locked_booking_fails_fast_with_conflict() {
    let Some(fx) = fixture(2, 1).await else {
        return;
    };
    let mut holder = fx.store.begin().await.unwrap();
    holder
        .find_booking_for_update(&fx.references[0])
        .await
        .unwrap();

    let service = AllocationService::new(fx.store.clone(), &AllocationConfig::without_delay());
    let err = service
        .allocate_safe(&fx.references[0], None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    holder.rollback().await.unwrap();
    let status = fx.store.pool_status(fx.flight_id).await.unwrap();
    assert_eq!(status.available, 2);
}

#[tokio::test]
async fn test_deadline_rolls_back_and_releases_lock() {
    let Some(fx) = fixture(1, 2).await else {
        return;
    };
    let slow = AllocationService::new(
        fx.store.clone(),
        &AllocationConfig {
            deadline_ms: 100,
            ..allocation(1_000)
        },
    );

    let err = slow.allocate_safe(&fx.references[0], None).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Timeout);

    let booking = fx.store.find_booking(&fx.references[0]).await.unwrap().unwrap();
    assert_eq!(booking.seat_id, None);

    // The dropped transaction's ROLLBACK is sent when its connection is next
    // used, so the row lock may linger for a moment.
    let fast = AllocationService::new(fx.store.clone(), &AllocationConfig::without_delay());
    let mut assignment = None;
    for _ in 0..40 {
        match fast.allocate_safe(&fx.references[1], None).await {
            Ok(a) => {
                assignment = Some(a);
                break;
            }
            Err(e) if e.kind == ErrorKind::PoolExhausted => {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(assignment.expect("seat never freed").seat_number, "1A");
}

#[tokio::test]
async fn test_release_round_trip() {
    let Some(fx) = fixture(1, 2).await else {
        return;
    };
    let service = AllocationService::new(fx.store.clone(), &AllocationConfig::without_delay());
    let admin = AdminService::new(fx.store.clone());

    let first = service.allocate_safe(&fx.references[0], None).await.unwrap();
    assert_eq!(
        admin.release(&fx.references[0]).await.unwrap(),
        Some(first.seat_id)
    );

    let second = service.allocate_safe(&fx.references[1], None).await.unwrap();
    assert_eq!(second.seat_id, first.seat_id);
}
