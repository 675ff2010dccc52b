pub mod booking;
pub mod schedule;
pub mod seat_map;

pub use booking::{Batch, Booking, BookingEvent, BookingStatus, ReleaseByDateRequest, SubmitBookingRequest, Transition};
pub use schedule::{DaySchedule, RotationInfo, ScheduleCheck, WeekSchedule};
pub use seat_map::{BufferQuota, SeatCell, SeatMapView, SeatStatus};
