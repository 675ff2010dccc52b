use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::Batch;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub day_name: &'static str,
    pub scheduled_batch: Option<Batch>,
    pub is_user_scheduled: bool,
    pub can_book_normally: bool,
    pub can_book_buffer: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekSchedule {
    pub week_number: u32,
    pub rotation_week: u8,
    pub schedule: Vec<DaySchedule>,
}

/// Answer to "am I on site that day, and how could I book it right now?"
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleCheck {
    pub date: NaiveDate,
    pub day_name: &'static str,
    pub user_batch: Batch,
    pub scheduled_batch: Option<Batch>,
    pub is_scheduled: bool,
    pub can_book_normally: bool,
    pub can_book_buffer: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RotationInfo {
    pub current_date: NaiveDateTime,
    pub rotation_week: u8,
    pub scheduled_batch_today: Option<Batch>,
    pub can_book_buffer_now: bool,
    pub buffer_booking_hour: u32,
    pub max_advance_booking_weeks: u32,
}
