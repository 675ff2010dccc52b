use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::db::BookingStore;
use crate::models::{Batch, Booking, BookingStatus};

const BOOKING_COLUMNS: &str =
    "id, user_id, date, seat_number, batch, is_buffer_booking, status, booked_at, released_at";

#[derive(Clone)]
pub struct SqliteBookingStore {
    db: SqlitePool,
}

impl SqliteBookingStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookingStore for SqliteBookingStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.db)
            .await
    }

    async fn find_for_user_on(&self, user_id: &str, date: NaiveDate) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = ? AND date = ?"
        ))
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.db)
        .await
    }

    async fn count_active(&self, date: NaiveDate) -> Result<u32, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE date = ? AND status = ?")
            .bind(date)
            .bind(BookingStatus::Active)
            .fetch_one(&self.db)
            .await?;
        Ok(count as u32)
    }

    async fn active_on(&self, date: NaiveDate) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE date = ? AND status = ? ORDER BY seat_number"
        ))
        .bind(date)
        .bind(BookingStatus::Active)
        .fetch_all(&self.db)
        .await
    }

    async fn count_active_buffer(&self, date: NaiveDate) -> Result<u32, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE date = ? AND status = ? AND is_buffer_booking = 1",
        )
        .bind(date)
        .bind(BookingStatus::Active)
        .fetch_one(&self.db)
        .await?;
        Ok(count as u32)
    }

    async fn count_released_scheduled(&self, date: NaiveDate, batch: Batch) -> Result<u32, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE date = ? AND status = ? AND is_buffer_booking = 0 AND batch = ?",
        )
        .bind(date)
        .bind(BookingStatus::Released)
        .bind(batch)
        .fetch_one(&self.db)
        .await?;
        Ok(count as u32)
    }

    async fn insert(&self, booking: &Booking) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO bookings
                (id, user_id, date, seat_number, batch, is_buffer_booking, status, booked_at, released_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.user_id)
        .bind(booking.date)
        .bind(booking.seat_number)
        .bind(booking.batch)
        .bind(booking.is_buffer_booking)
        .bind(booking.status)
        .bind(booking.booked_at)
        .bind(booking.released_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn update(&self, booking: &Booking) -> Result<(), sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET seat_number = ?, batch = ?, is_buffer_booking = ?, status = ?, booked_at = ?, released_at = ?
            WHERE id = ?
            "#,
        )
        .bind(booking.seat_number)
        .bind(booking.batch)
        .bind(booking.is_buffer_booking)
        .bind(booking.status)
        .bind(booking.booked_at)
        .bind(booking.released_at)
        .bind(&booking.id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }
}
