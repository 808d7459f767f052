//! Reservation module: bookings and the check-in / check-out lifecycle

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
