use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::config::SeatPolicy;
use crate::db::BookingStore;
use crate::error::{AppError, Rejection};
use crate::models::{Batch, Booking, BookingStatus, BufferQuota, Transition};
use crate::services::locks::DateLocks;
use crate::services::rotation;

/// Years a booking date may fall in. Calendar arithmetic on the parsed date
/// stays far from chrono's representable range.
const BOOKABLE_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// Accepts `YYYY-MM-DD` or a date-time (RFC 3339 or naive ISO 8601); the
/// time of day is dropped.
pub fn parse_booking_date(raw: &str) -> Result<NaiveDate, Rejection> {
    let raw = raw.trim();
    let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| chrono::DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| raw.parse::<NaiveDateTime>().ok().map(|dt| dt.date()));
    match parsed {
        Some(date) if BOOKABLE_YEARS.contains(&date.year()) => Ok(date),
        _ => Err(Rejection::InvalidDate(raw.to_string())),
    }
}

/// Decides whether a booking request is allowed and, if so, claims a seat.
pub struct AdmissionEngine {
    store: Arc<dyn BookingStore>,
    policy: SeatPolicy,
    locks: DateLocks,
}

impl AdmissionEngine {
    pub fn new(store: Arc<dyn BookingStore>, policy: SeatPolicy) -> Self {
        Self {
            store,
            policy,
            locks: DateLocks::new(),
        }
    }

    pub fn policy(&self) -> &SeatPolicy {
        &self.policy
    }

    pub fn store(&self) -> &Arc<dyn BookingStore> {
        &self.store
    }

    pub fn locks(&self) -> &DateLocks {
        &self.locks
    }

    pub fn validate_seat(&self, seat: i64) -> Result<u32, Rejection> {
        match u32::try_from(seat) {
            Ok(seat) if (1..=self.policy.total_seats).contains(&seat) => Ok(seat),
            _ => Err(Rejection::InvalidSeat {
                total_seats: self.policy.total_seats,
            }),
        }
    }

    /// Weekday and not in the past.
    pub fn check_bookable_day(&self, date: NaiveDate, today: NaiveDate) -> Result<(), Rejection> {
        if !rotation::is_weekday(date) {
            return Err(Rejection::NotWeekday);
        }
        if date < today {
            return Err(Rejection::PastDate);
        }
        Ok(())
    }

    pub fn check_scheduled_window(&self, date: NaiveDate, today: NaiveDate) -> Result<(), Rejection> {
        if rotation::is_within_advance_window(date, self.policy.max_advance_weeks, today) {
            Ok(())
        } else {
            Err(Rejection::OutsideAdvanceWindow {
                max_weeks: self.policy.max_advance_weeks,
            })
        }
    }

    pub fn check_buffer_window(&self, date: NaiveDate, now: NaiveDateTime) -> Result<(), Rejection> {
        if !rotation::buffer_window_open(now, self.policy.buffer_window_start_hour) {
            return Err(Rejection::BufferWindowClosed {
                start_hour: self.policy.buffer_window_start_hour,
            });
        }
        if date != rotation::next_buffer_date(now) {
            return Err(Rejection::BufferWrongDate);
        }
        Ok(())
    }

    pub async fn buffer_quota(&self, date: NaiveDate) -> Result<BufferQuota, sqlx::Error> {
        let released = match rotation::scheduled_batch(date) {
            Some(batch) => self.store.count_released_scheduled(date, batch).await?,
            None => 0,
        };
        let used = self.store.count_active_buffer(date).await?;
        Ok(BufferQuota::compute(self.policy.base_buffer_quota(), released, used))
    }

    pub async fn submit(
        &self,
        user_id: &str,
        user_batch: Batch,
        raw_date: &str,
        requested_seat: Option<i64>,
        now: NaiveDateTime,
    ) -> Result<Booking, AppError> {
        let result = self.admit(user_id, user_batch, raw_date, requested_seat, now).await;
        match &result {
            Ok(booking) => info!(
                "booking admitted: user={} date={} seat={:?} buffer={}",
                booking.user_id, booking.date, booking.seat_number, booking.is_buffer_booking
            ),
            Err(AppError::Rejected(rejection)) => debug!(
                "booking rejected: user={} date={} code={}",
                user_id,
                raw_date,
                rejection.code()
            ),
            Err(_) => {}
        }
        result
    }

    async fn admit(
        &self,
        user_id: &str,
        user_batch: Batch,
        raw_date: &str,
        requested_seat: Option<i64>,
        now: NaiveDateTime,
    ) -> Result<Booking, AppError> {
        let today = now.date();
        let date = parse_booking_date(raw_date)?;
        let requested_seat = requested_seat.map(|seat| self.validate_seat(seat)).transpose()?;
        self.check_bookable_day(date, today)?;

        let _guard = self.locks.acquire(date, today).await;

        let existing = self.store.find_for_user_on(user_id, date).await?;
        if existing.as_ref().is_some_and(Booking::is_active) {
            return Err(Rejection::AlreadyBooked.into());
        }

        let is_buffer = !rotation::is_user_scheduled(user_batch, date);
        if is_buffer {
            self.check_buffer_window(date, now)?;
        } else {
            self.check_scheduled_window(date, today)?;
        }

        if self.store.count_active(date).await? >= self.policy.total_seats {
            return Err(Rejection::NoSeats.into());
        }

        if is_buffer && self.buffer_quota(date).await?.available == 0 {
            return Err(Rejection::NoBufferSeats.into());
        }

        let seat = self.pick_seat(date, requested_seat).await?;

        let booking = match existing {
            Some(mut booking) => {
                if booking.claim(seat, user_batch, is_buffer, now) == Transition::Illegal {
                    return Err(Rejection::AlreadyBooked.into());
                }
                self.store
                    .update(&booking)
                    .await
                    .map_err(|e| commit_conflict(e, seat))?;
                booking
            }
            None => {
                let booking = Booking::new_active(user_id, date, seat, user_batch, is_buffer, now);
                self.store
                    .insert(&booking)
                    .await
                    .map_err(|e| commit_conflict(e, seat))?;
                booking
            }
        };

        Ok(booking)
    }

    /// The requested seat if it is free, otherwise the lowest free seat.
    async fn pick_seat(&self, date: NaiveDate, requested: Option<u32>) -> Result<u32, AppError> {
        let occupied: HashSet<u32> = self
            .store
            .active_on(date)
            .await?
            .into_iter()
            .filter_map(|b| b.seat_number)
            .collect();

        match requested {
            Some(seat) if occupied.contains(&seat) => Err(Rejection::SeatTaken(seat).into()),
            Some(seat) => Ok(seat),
            None => (1..=self.policy.total_seats)
                .find(|seat| !occupied.contains(seat))
                .ok_or_else(|| Rejection::NoSeats.into()),
        }
    }

    pub async fn release(&self, booking_id: &str, user_id: &str, now: NaiveDateTime) -> Result<Booking, AppError> {
        let today = now.date();
        let booking = self
            .store
            .find_by_id(booking_id)
            .await?
            .ok_or(Rejection::NotFound)?;
        if booking.user_id != user_id {
            return Err(Rejection::NotOwned.into());
        }

        let _guard = self.locks.acquire(booking.date, today).await;
        let mut booking = self
            .store
            .find_by_id(booking_id)
            .await?
            .ok_or(Rejection::NotFound)?;

        if booking.status == BookingStatus::Released {
            return Err(Rejection::AlreadyReleased.into());
        }
        if booking.date < today {
            return Err(Rejection::PastBooking.into());
        }

        booking.release(now);
        self.store.update(&booking).await?;
        info!(
            "booking released: id={} user={} date={}",
            booking.id, booking.user_id, booking.date
        );
        Ok(booking)
    }

    /// Frees a scheduled user's guaranteed seat for `date`, whether or not
    /// they ever booked it, so the buffer pool grows by one.
    pub async fn release_by_date(
        &self,
        user_id: &str,
        user_batch: Batch,
        raw_date: &str,
        now: NaiveDateTime,
    ) -> Result<Booking, AppError> {
        let today = now.date();
        let date = parse_booking_date(raw_date)?;
        self.check_bookable_day(date, today)?;
        if !rotation::is_user_scheduled(user_batch, date) {
            return Err(Rejection::NotScheduled.into());
        }

        let _guard = self.locks.acquire(date, today).await;

        let booking = match self.store.find_for_user_on(user_id, date).await? {
            None => {
                let booking = Booking::new_released(user_id, date, user_batch, now);
                self.store.insert(&booking).await?;
                booking
            }
            Some(mut booking) => {
                if booking.release(now) == Transition::Unchanged {
                    return Ok(booking);
                }
                self.store.update(&booking).await?;
                booking
            }
        };

        info!("scheduled seat released: user={} date={}", user_id, date);
        Ok(booking)
    }
}

/// A unique-index hit on commit means another writer got there first.
fn commit_conflict(err: sqlx::Error, seat: u32) -> AppError {
    let seat_clash = match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => Some(db.message().contains("seat_number")),
        _ => None,
    };
    match seat_clash {
        Some(true) => {
            warn!("seat {} claimed concurrently", seat);
            Rejection::SeatTaken(seat).into()
        }
        Some(false) => {
            warn!("booking for the same user and date committed concurrently");
            Rejection::AlreadyBooked.into()
        }
        None => err.into(),
    }
}
