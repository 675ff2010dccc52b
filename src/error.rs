use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    /// Malformed input, caught before touching the store.
    Validation,
    /// A booking rule said no; nothing was written.
    Policy,
    /// The store was read and there was no room.
    Capacity,
    NotFound,
    NotOwned,
}

/// Why a booking request was turned down. Every variant maps to one stable
/// code and one message the client can show as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Invalid booking date: {0}")]
    InvalidDate(String),

    #[error("Seat number must be between 1 and {total_seats}")]
    InvalidSeat { total_seats: u32 },

    #[error("Bookings can only be made for weekdays (Monday-Friday)")]
    NotWeekday,

    #[error("Cannot book for past dates")]
    PastDate,

    #[error("You already have an active booking for this date")]
    AlreadyBooked,

    #[error("You can only book up to {max_weeks} weeks in advance")]
    OutsideAdvanceWindow { max_weeks: u32 },

    #[error("Buffer bookings can only be made after {start_hour}:00")]
    BufferWindowClosed { start_hour: u32 },

    #[error("Buffer bookings can only be made for the next day")]
    BufferWrongDate,

    #[error("No seats available for this date")]
    NoSeats,

    #[error("No buffer seats available for this date")]
    NoBufferSeats,

    #[error("Seat {0} is already taken")]
    SeatTaken(u32),

    #[error("Booking not found")]
    NotFound,

    #[error("Not authorized to release this booking")]
    NotOwned,

    #[error("Booking is already released")]
    AlreadyReleased,

    #[error("Cannot release past bookings")]
    PastBooking,

    #[error("You can only release a seat on your scheduled day")]
    NotScheduled,
}

impl Rejection {
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::InvalidDate(_) => "invalid_date",
            Rejection::InvalidSeat { .. } => "invalid_seat",
            Rejection::NotWeekday => "not_weekday",
            Rejection::PastDate => "past_date",
            Rejection::AlreadyBooked => "already_booked",
            Rejection::OutsideAdvanceWindow { .. } => "outside_advance_window",
            Rejection::BufferWindowClosed { .. } => "buffer_window_closed",
            Rejection::BufferWrongDate => "buffer_wrong_date",
            Rejection::NoSeats => "no_seats",
            Rejection::NoBufferSeats => "no_buffer_seats",
            Rejection::SeatTaken(_) => "seat_taken",
            Rejection::NotFound => "not_found",
            Rejection::NotOwned => "not_owned",
            Rejection::AlreadyReleased => "already_released",
            Rejection::PastBooking => "past_booking",
            Rejection::NotScheduled => "not_scheduled",
        }
    }

    pub fn kind(&self) -> RejectionKind {
        match self {
            Rejection::InvalidDate(_) | Rejection::InvalidSeat { .. } => RejectionKind::Validation,
            Rejection::NoSeats | Rejection::NoBufferSeats | Rejection::SeatTaken(_) => {
                RejectionKind::Capacity
            }
            Rejection::NotFound => RejectionKind::NotFound,
            Rejection::NotOwned => RejectionKind::NotOwned,
            _ => RejectionKind::Policy,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Rejected(rejection) => {
                let status = match rejection.kind() {
                    RejectionKind::Validation | RejectionKind::Policy => StatusCode::BAD_REQUEST,
                    RejectionKind::Capacity => StatusCode::CONFLICT,
                    RejectionKind::NotFound => StatusCode::NOT_FOUND,
                    RejectionKind::NotOwned => StatusCode::FORBIDDEN,
                };
                (status, rejection.code(), rejection.to_string())
            }
            AppError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, "unauthenticated", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AppError::Database(e) => {
                error!("database error: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "store_unavailable",
                    "Database error occurred, please retry".to_string(),
                )
            }
            AppError::Config(msg) => {
                error!("configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            code: code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}
