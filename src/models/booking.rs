use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One of the two rotating cohorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum Batch {
    #[serde(rename = "BATCH_1")]
    #[sqlx(rename = "BATCH_1")]
    Batch1,
    #[serde(rename = "BATCH_2")]
    #[sqlx(rename = "BATCH_2")]
    Batch2,
}

impl Batch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Batch::Batch1 => "BATCH_1",
            Batch::Batch2 => "BATCH_2",
        }
    }

    pub fn other(&self) -> Batch {
        match self {
            Batch::Batch1 => Batch::Batch2,
            Batch::Batch2 => Batch::Batch1,
        }
    }
}

impl fmt::Display for Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Batch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "BATCH_1" => Ok(Batch::Batch1),
            "BATCH_2" => Ok(Batch::Batch2),
            other => Err(format!("unknown batch: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BookingStatus {
    Active,
    Released,
    Cancelled,
}

/// Inputs to the booking state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingEvent {
    /// A seat is (re)claimed through admission.
    Claim,
    /// The holder gives the day up.
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved(BookingStatus),
    Unchanged,
    Illegal,
}

impl BookingStatus {
    /// Edges: Claim takes any non-active record to ACTIVE; Release takes
    /// ACTIVE or CANCELLED to RELEASED and leaves RELEASED where it is.
    pub fn apply(self, event: BookingEvent) -> Transition {
        use BookingStatus::*;
        match (self, event) {
            (Active, BookingEvent::Claim) => Transition::Illegal,
            (Released | Cancelled, BookingEvent::Claim) => Transition::Moved(Active),
            (Active | Cancelled, BookingEvent::Release) => Transition::Moved(Released),
            (Released, BookingEvent::Release) => Transition::Unchanged,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub seat_number: Option<u32>,
    pub batch: Batch,
    pub is_buffer_booking: bool,
    pub status: BookingStatus,
    pub booked_at: NaiveDateTime,
    pub released_at: Option<NaiveDateTime>,
}

impl Booking {
    pub fn new_active(
        user_id: &str,
        date: NaiveDate,
        seat_number: u32,
        batch: Batch,
        is_buffer_booking: bool,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            date,
            seat_number: Some(seat_number),
            batch,
            is_buffer_booking,
            status: BookingStatus::Active,
            booked_at: now,
            released_at: None,
        }
    }

    /// A released placeholder for a scheduled user who gives up a day
    /// they never booked.
    pub fn new_released(user_id: &str, date: NaiveDate, batch: Batch, now: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            date,
            seat_number: None,
            batch,
            is_buffer_booking: false,
            status: BookingStatus::Released,
            booked_at: now,
            released_at: Some(now),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == BookingStatus::Active
    }

    /// Reuses this record for a new admission. Returns the transition so the
    /// caller can tell an illegal re-claim apart from a successful one.
    pub fn claim(
        &mut self,
        seat_number: u32,
        batch: Batch,
        is_buffer_booking: bool,
        now: NaiveDateTime,
    ) -> Transition {
        let transition = self.status.apply(BookingEvent::Claim);
        if let Transition::Moved(next) = transition {
            self.status = next;
            self.seat_number = Some(seat_number);
            self.batch = batch;
            self.is_buffer_booking = is_buffer_booking;
            self.booked_at = now;
            self.released_at = None;
        }
        transition
    }

    pub fn release(&mut self, now: NaiveDateTime) -> Transition {
        let transition = self.status.apply(BookingEvent::Release);
        if let Transition::Moved(next) = transition {
            self.status = next;
            self.released_at = Some(now);
        }
        transition
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitBookingRequest {
    pub date: String,
    #[serde(default)]
    pub seat_number: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseByDateRequest {
    pub date: String,
}
