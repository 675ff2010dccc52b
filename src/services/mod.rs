pub mod admission;
pub mod locks;
pub mod rotation;
pub mod seat_map;

pub use admission::{AdmissionEngine, parse_booking_date};
pub use locks::DateLocks;
pub use seat_map::SeatMapProjector;
