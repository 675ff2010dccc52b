use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::error::AppError;

/// Longest advance-booking horizon accepted from configuration.
pub const MAX_ADVANCE_WEEKS_LIMIT: u32 = 52;

/// Values the booking rules depend on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeatPolicy {
    pub total_seats: u32,
    /// Seats guaranteed to whichever batch is scheduled on a day.
    pub members_per_batch: u32,
    /// Local hour from which buffer bookings for tomorrow open.
    pub buffer_window_start_hour: u32,
    pub max_advance_weeks: u32,
}

impl SeatPolicy {
    pub fn base_buffer_quota(&self) -> u32 {
        self.total_seats.saturating_sub(self.members_per_batch)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.buffer_window_start_hour > 23 {
            return Err(AppError::Config(format!(
                "BUFFER_BOOKING_HOUR must be between 0 and 23, got {}",
                self.buffer_window_start_hour
            )));
        }
        if self.total_seats == 0 {
            return Err(AppError::Config("TOTAL_SEATS must be at least 1".to_string()));
        }
        if self.max_advance_weeks > MAX_ADVANCE_WEEKS_LIMIT {
            return Err(AppError::Config(format!(
                "MAX_ADVANCE_BOOKING_WEEKS must be at most {MAX_ADVANCE_WEEKS_LIMIT}, got {}",
                self.max_advance_weeks
            )));
        }
        Ok(())
    }
}

impl Default for SeatPolicy {
    fn default() -> Self {
        Self {
            total_seats: 50,
            members_per_batch: 8 * 5,
            buffer_window_start_hour: 15,
            max_advance_weeks: 2,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub policy: SeatPolicy,
}

impl Config {
    pub fn new_from_env() -> Result<Self, AppError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://seat_booking.db".to_string());
        let bind_addr = env_or("BIND_ADDR", SocketAddr::from(([127, 0, 0, 1], 3000)))?;

        let defaults = SeatPolicy::default();
        let total_seats = env_or("TOTAL_SEATS", defaults.total_seats)?;
        let members_per_squad: u32 = env_or("MEMBERS_PER_SQUAD", 8)?;
        let squads_per_batch: u32 = env_or("SQUADS_PER_BATCH", 5)?;
        let members_per_batch = env_or("MEMBERS_PER_BATCH", members_per_squad * squads_per_batch)?;
        let buffer_window_start_hour = env_or("BUFFER_BOOKING_HOUR", defaults.buffer_window_start_hour)?;
        let max_advance_weeks = env_or("MAX_ADVANCE_BOOKING_WEEKS", defaults.max_advance_weeks)?;

        let policy = SeatPolicy {
            total_seats,
            members_per_batch,
            buffer_window_start_hour,
            max_advance_weeks,
        };
        policy.validate()?;

        Ok(Self {
            database_url,
            bind_addr,
            policy,
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} is invalid ({raw}): {e}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_leaves_ten_buffer_seats() {
        let policy = SeatPolicy::default();
        assert_eq!(policy.members_per_batch, 40);
        assert_eq!(policy.base_buffer_quota(), 10);
    }

    #[test]
    fn default_policy_is_valid() {
        assert!(SeatPolicy::default().validate().is_ok());
    }

    #[test]
    fn advance_weeks_above_limit_is_rejected() {
        let policy = SeatPolicy {
            max_advance_weeks: u32::MAX,
            ..SeatPolicy::default()
        };
        assert!(matches!(policy.validate(), Err(AppError::Config(_))));

        let policy = SeatPolicy {
            max_advance_weeks: MAX_ADVANCE_WEEKS_LIMIT,
            ..SeatPolicy::default()
        };
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn buffer_hour_and_seat_count_are_checked() {
        let late = SeatPolicy {
            buffer_window_start_hour: 24,
            ..SeatPolicy::default()
        };
        assert!(late.validate().is_err());

        let empty = SeatPolicy {
            total_seats: 0,
            ..SeatPolicy::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn base_quota_never_goes_negative() {
        let policy = SeatPolicy {
            total_seats: 30,
            members_per_batch: 40,
            ..SeatPolicy::default()
        };
        assert_eq!(policy.base_buffer_quota(), 0);
    }
}
