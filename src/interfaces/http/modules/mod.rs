//! HTTP resource modules, one per resource: DTOs plus handlers

pub mod accounts;
pub mod guests;
pub mod health;
pub mod housekeeping;
pub mod metrics;
pub mod reservations;
pub mod rooms;
pub mod transactions;
