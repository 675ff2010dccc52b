use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::error::AppError;
use crate::models::{Batch, SeatCell, SeatMapView, SeatStatus};
use crate::services::admission::{AdmissionEngine, parse_booking_date};
use crate::services::rotation;

/// Builds the per-seat view of a date for one requester. Advisory only:
/// `AdmissionEngine::submit` re-checks everything.
pub struct SeatMapProjector {
    engine: Arc<AdmissionEngine>,
}

impl SeatMapProjector {
    pub fn new(engine: Arc<AdmissionEngine>) -> Self {
        Self { engine }
    }

    pub async fn render(
        &self,
        raw_date: &str,
        user_id: &str,
        user_batch: Batch,
        now: NaiveDateTime,
    ) -> Result<SeatMapView, AppError> {
        let today = now.date();
        let date = parse_booking_date(raw_date)?;
        let total_seats = self.engine.policy().total_seats;

        let active = self.engine.store().active_on(date).await?;
        let owners: HashMap<u32, &str> = active
            .iter()
            .filter_map(|b| b.seat_number.map(|seat| (seat, b.user_id.as_str())))
            .collect();
        let booked_seats = active.len() as u32;
        let saturated = booked_seats >= total_seats;
        let holds_booking = active.iter().any(|b| b.user_id == user_id);

        let scheduled_batch = rotation::scheduled_batch(date);
        let is_user_scheduled = scheduled_batch == Some(user_batch);
        let buffer_quota = self.engine.buffer_quota(date).await?;

        let day_open = self.engine.check_bookable_day(date, today);
        let buffer_check = day_open
            .clone()
            .and_then(|_| self.engine.check_buffer_window(date, now));
        let buffer_reason = if is_user_scheduled {
            None
        } else {
            match &buffer_check {
                Err(rejection) => Some(rejection.to_string()),
                Ok(()) if buffer_quota.available == 0 => {
                    Some("Buffer seats are full for this day".to_string())
                }
                Ok(()) => None,
            }
        };
        let can_book_buffer = !is_user_scheduled && buffer_reason.is_none() && !saturated;

        let eligible = if is_user_scheduled {
            day_open
                .and_then(|_| self.engine.check_scheduled_window(date, today))
                .is_ok()
        } else {
            can_book_buffer
        };
        let can_book = eligible && !holds_booking && !saturated;
        let open_status = if is_user_scheduled {
            SeatStatus::Available
        } else {
            SeatStatus::Buffer
        };

        let seats = (1..=total_seats)
            .map(|seat_number| {
                let status = match owners.get(&seat_number) {
                    Some(owner) if *owner == user_id => SeatStatus::YourBooking,
                    Some(_) => SeatStatus::Full,
                    None if can_book => open_status,
                    None => SeatStatus::Full,
                };
                SeatCell { seat_number, status }
            })
            .collect();

        Ok(SeatMapView {
            date,
            total_seats,
            booked_seats,
            available_seats: total_seats.saturating_sub(booked_seats),
            scheduled_batch,
            user_batch,
            is_user_scheduled,
            can_book,
            can_book_buffer,
            buffer_reason,
            buffer_quota,
            seats,
        })
    }
}
