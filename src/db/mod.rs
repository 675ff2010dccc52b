pub mod repository;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::migrate::Migrator;

use crate::models::{Batch, Booking};

pub use repository::SqliteBookingStore;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// The narrow slice of the record store the booking rules need.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, sqlx::Error>;
    async fn find_for_user_on(&self, user_id: &str, date: NaiveDate) -> Result<Option<Booking>, sqlx::Error>;
    async fn count_active(&self, date: NaiveDate) -> Result<u32, sqlx::Error>;
    /// Active bookings for a date, ordered by seat.
    async fn active_on(&self, date: NaiveDate) -> Result<Vec<Booking>, sqlx::Error>;
    async fn count_active_buffer(&self, date: NaiveDate) -> Result<u32, sqlx::Error>;
    /// Released, non-buffer bookings made under `batch` for `date`.
    async fn count_released_scheduled(&self, date: NaiveDate, batch: Batch) -> Result<u32, sqlx::Error>;
    async fn insert(&self, booking: &Booking) -> Result<(), sqlx::Error>;
    async fn update(&self, booking: &Booking) -> Result<(), sqlx::Error>;
}
