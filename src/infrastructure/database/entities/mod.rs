//! Database entities module

pub mod account;
pub mod financial_transaction;
pub mod guest;
pub mod housekeeping_task;
pub mod reservation;
pub mod room;

pub use account::Entity as Account;
pub use financial_transaction::Entity as FinancialTransaction;
pub use guest::Entity as Guest;
pub use housekeeping_task::Entity as HousekeepingTask;
pub use reservation::Entity as Reservation;
pub use room::Entity as Room;
