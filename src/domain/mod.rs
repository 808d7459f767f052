pub mod guest;
pub mod housekeeping;
pub mod ledger;
pub mod reservation;
pub mod room;
pub mod unit_of_work;

// Re-export commonly used types
pub use guest::Guest;
pub use housekeeping::{HousekeepingTask, TaskChanges, TaskPriority, TaskStatus, TaskType};
pub use ledger::{
    rebalance, Account, AccountType, Direction, FinancialTransaction, NewTransaction, Posting,
    TransactionChanges, TransactionStatus,
};
pub use reservation::{
    NewReservation, Reservation, ReservationChanges, ReservationDetails, ReservationStatus,
    Transition,
};
pub use room::{Room, RoomStatus, RoomType};
pub use unit_of_work::{finish, UnitOfWork, WorkScope};

pub use crate::shared::errors::{DomainError, DomainResult};
