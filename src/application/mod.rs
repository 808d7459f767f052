//! Application layer: operations that span more than one record

pub mod services;

pub use services::{HousekeepingService, LedgerService, ReservationLifecycle};
