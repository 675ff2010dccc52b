//! Two-week rotation between the batches.
//!
//! Week 1: BATCH_1 on site Mon-Wed, BATCH_2 Thu-Fri.
//! Week 2: the other way round. The cycle repeats every 14 days from
//! [`ROTATION_EPOCH`].

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Timelike, Weekday};

use crate::config::SeatPolicy;
use crate::models::{Batch, DaySchedule, RotationInfo, WeekSchedule};

/// Monday that opens rotation week 1.
pub const ROTATION_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(2024, 1, 1) {
    Some(date) => date,
    None => panic!("invalid rotation epoch"),
};

/// Whole weeks between the epoch and `date`, counted on the absolute day
/// difference so dates before the epoch mirror the ones after it.
pub fn week_index(date: NaiveDate) -> u64 {
    date.signed_duration_since(ROTATION_EPOCH).num_days().unsigned_abs() / 7
}

pub fn rotation_week(date: NaiveDate) -> u8 {
    if week_index(date) % 2 == 0 { 1 } else { 2 }
}

pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn scheduled_batch(date: NaiveDate) -> Option<Batch> {
    let early_week = match date.weekday() {
        Weekday::Mon | Weekday::Tue | Weekday::Wed => true,
        Weekday::Thu | Weekday::Fri => false,
        Weekday::Sat | Weekday::Sun => return None,
    };
    let owner = if early_week { Batch::Batch1 } else { Batch::Batch2 };
    match rotation_week(date) {
        1 => Some(owner),
        _ => Some(owner.other()),
    }
}

pub fn is_user_scheduled(batch: Batch, date: NaiveDate) -> bool {
    scheduled_batch(date) == Some(batch)
}

pub fn day_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

pub fn weekly_schedule(batch: Batch, anchor: NaiveDate) -> Vec<DaySchedule> {
    let monday = week_start(anchor);
    (0..5)
        .map(|offset| {
            let date = monday + Days::new(offset);
            let scheduled = scheduled_batch(date);
            let is_user_scheduled = scheduled == Some(batch);
            DaySchedule {
                date,
                day_name: day_name(date),
                scheduled_batch: scheduled,
                is_user_scheduled,
                can_book_normally: is_user_scheduled,
                can_book_buffer: !is_user_scheduled,
            }
        })
        .collect()
}

pub fn multi_week_schedule(batch: Batch, weeks: u32, today: NaiveDate) -> Vec<WeekSchedule> {
    (0..weeks)
        .map(|i| {
            let anchor = today + Days::new(u64::from(i) * 7);
            WeekSchedule {
                week_number: i + 1,
                rotation_week: rotation_week(anchor),
                schedule: weekly_schedule(batch, anchor),
            }
        })
        .collect()
}

/// `today <= date <= today + max_weeks * 7`, both ends inclusive.
pub fn is_within_advance_window(date: NaiveDate, max_weeks: u32, today: NaiveDate) -> bool {
    let last = today.checked_add_days(Days::new(u64::from(max_weeks) * 7));
    date >= today && last.is_none_or(|last| date <= last)
}

pub fn buffer_window_open(now: NaiveDateTime, start_hour: u32) -> bool {
    now.hour() >= start_hour
}

/// The only date a buffer booking may target at `now`. Not adjusted for
/// weekends: on a Friday this is a Saturday.
pub fn next_buffer_date(now: NaiveDateTime) -> NaiveDate {
    now.date() + Days::new(1)
}

pub fn rotation_info(now: NaiveDateTime, policy: &SeatPolicy) -> RotationInfo {
    let today = now.date();
    RotationInfo {
        current_date: now,
        rotation_week: rotation_week(today),
        scheduled_batch_today: scheduled_batch(today),
        can_book_buffer_now: buffer_window_open(now, policy.buffer_window_start_hour),
        buffer_booking_hour: policy.buffer_window_start_hour,
        max_advance_booking_weeks: policy.max_advance_weeks,
    }
}
