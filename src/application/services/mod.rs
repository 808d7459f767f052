//! Application services

mod housekeeping;
mod ledger;
mod reservation_lifecycle;

pub use housekeeping::HousekeepingService;
pub use ledger::LedgerService;
pub use reservation_lifecycle::ReservationLifecycle;
