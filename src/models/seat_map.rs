use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Batch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeatStatus {
    YourBooking,
    Full,
    Buffer,
    Available,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeatCell {
    pub seat_number: u32,
    pub status: SeatStatus,
}

/// Seats open to buffer bookings on a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BufferQuota {
    pub total: u32,
    pub used: u32,
    pub available: u32,
}

impl BufferQuota {
    /// `base` is the structural share (seats beyond what the scheduled batch
    /// is guaranteed); each released scheduled seat adds one more.
    pub fn compute(base: u32, released_scheduled_seats: u32, used: u32) -> Self {
        let total = base + released_scheduled_seats;
        Self {
            total,
            used,
            available: total.saturating_sub(used),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatMapView {
    pub date: NaiveDate,
    pub total_seats: u32,
    pub booked_seats: u32,
    pub available_seats: u32,
    pub scheduled_batch: Option<Batch>,
    pub user_batch: Batch,
    pub is_user_scheduled: bool,
    pub can_book: bool,
    pub can_book_buffer: bool,
    pub buffer_reason: Option<String>,
    pub buffer_quota: BufferQuota,
    pub seats: Vec<SeatCell>,
}
