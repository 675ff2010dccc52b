mod common;

use common::{at, day, setup_pool};
use seat_booking::db::{BookingStore, SqliteBookingStore};
use seat_booking::models::{Batch, Booking, BookingEvent, BookingStatus, BufferQuota, Transition};

#[test]
fn test_status_transitions() {
    use BookingStatus::*;

    assert_eq!(Active.apply(BookingEvent::Claim), Transition::Illegal);
    assert_eq!(Released.apply(BookingEvent::Claim), Transition::Moved(Active));
    assert_eq!(Cancelled.apply(BookingEvent::Claim), Transition::Moved(Active));

    assert_eq!(Active.apply(BookingEvent::Release), Transition::Moved(Released));
    assert_eq!(Cancelled.apply(BookingEvent::Release), Transition::Moved(Released));
    assert_eq!(Released.apply(BookingEvent::Release), Transition::Unchanged);
}

#[test]
fn test_release_then_claim_resets_the_record() {
    let mut booking = Booking::new_active("alice", day("2024-01-02"), 4, Batch::Batch1, false, at("2024-01-01", 9, 0));

    assert_eq!(booking.release(at("2024-01-01", 10, 0)), Transition::Moved(BookingStatus::Released));
    assert_eq!(booking.released_at, Some(at("2024-01-01", 10, 0)));

    // Releasing twice keeps the first timestamp.
    assert_eq!(booking.release(at("2024-01-01", 11, 0)), Transition::Unchanged);
    assert_eq!(booking.released_at, Some(at("2024-01-01", 10, 0)));

    let id = booking.id.clone();
    assert_eq!(
        booking.claim(9, Batch::Batch2, true, at("2024-01-01", 15, 0)),
        Transition::Moved(BookingStatus::Active)
    );
    assert_eq!(booking.id, id);
    assert_eq!(booking.seat_number, Some(9));
    assert_eq!(booking.batch, Batch::Batch2);
    assert!(booking.is_buffer_booking);
    assert_eq!(booking.released_at, None);

    assert_eq!(booking.claim(1, Batch::Batch1, false, at("2024-01-01", 16, 0)), Transition::Illegal);
    assert_eq!(booking.seat_number, Some(9));
}

#[test]
fn test_buffer_quota_arithmetic() {
    assert_eq!(
        BufferQuota::compute(42, 0, 0),
        BufferQuota { total: 42, used: 0, available: 42 }
    );
    assert_eq!(BufferQuota::compute(2, 1, 3).available, 0);
    assert_eq!(BufferQuota::compute(2, 2, 3).available, 1);
    assert_eq!(BufferQuota::compute(0, 0, 5).available, 0);
}

#[tokio::test]
async fn test_store_rejects_two_active_bookings_on_one_seat() {
    let store = SqliteBookingStore::new(setup_pool().await);
    let now = at("2024-01-01", 9, 0);
    let date = day("2024-01-02");

    store
        .insert(&Booking::new_active("alice", date, 3, Batch::Batch1, false, now))
        .await
        .unwrap();

    let err = store
        .insert(&Booking::new_active("bob", date, 3, Batch::Batch1, false, now))
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db) => assert!(db.is_unique_violation()),
        other => panic!("expected a unique violation, got {other:?}"),
    }

    // Same seat on another day is fine, and so is a released row on the same seat.
    store
        .insert(&Booking::new_active("bob", day("2024-01-03"), 3, Batch::Batch1, false, now))
        .await
        .unwrap();
    let mut carol = Booking::new_active("carol", date, 3, Batch::Batch1, false, now);
    carol.status = BookingStatus::Released;
    store.insert(&carol).await.unwrap();

    assert_eq!(store.count_active(date).await.unwrap(), 1);
}

#[tokio::test]
async fn test_store_rejects_second_row_for_user_and_day() {
    let store = SqliteBookingStore::new(setup_pool().await);
    let now = at("2024-01-01", 9, 0);
    let date = day("2024-01-02");

    store
        .insert(&Booking::new_released("alice", date, Batch::Batch1, now))
        .await
        .unwrap();
    let err = store
        .insert(&Booking::new_active("alice", date, 1, Batch::Batch1, false, now))
        .await
        .unwrap_err();
    assert!(matches!(err, sqlx::Error::Database(ref db) if db.is_unique_violation()));
}

#[tokio::test]
async fn test_store_counts() {
    let store = SqliteBookingStore::new(setup_pool().await);
    let now = at("2024-01-01", 15, 0);
    let date = day("2024-01-02");

    store
        .insert(&Booking::new_active("a", date, 1, Batch::Batch1, false, now))
        .await
        .unwrap();
    store
        .insert(&Booking::new_active("b", date, 2, Batch::Batch2, true, now))
        .await
        .unwrap();
    store
        .insert(&Booking::new_released("c", date, Batch::Batch1, now))
        .await
        .unwrap();
    store
        .insert(&Booking::new_released("d", date, Batch::Batch2, now))
        .await
        .unwrap();

    assert_eq!(store.count_active(date).await.unwrap(), 2);
    assert_eq!(store.count_active_buffer(date).await.unwrap(), 1);
    assert_eq!(store.count_released_scheduled(date, Batch::Batch1).await.unwrap(), 1);

    let active = store.active_on(date).await.unwrap();
    assert_eq!(
        active.iter().map(|b| b.seat_number).collect::<Vec<_>>(),
        vec![Some(1), Some(2)]
    );

    let found = store.find_by_id(&active[1].id).await.unwrap().unwrap();
    assert_eq!(found.user_id, "b");
    assert!(found.is_buffer_booking);
    assert!(store.find_for_user_on("z", date).await.unwrap().is_none());
}
