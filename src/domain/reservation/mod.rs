//! Reservation aggregate
//!
//! The reservation entity, its status machine and the guarded transitions.

pub mod model;

pub use model::{
    NewReservation, Reservation, ReservationChanges, ReservationDetails, ReservationStatus,
    Transition,
};
