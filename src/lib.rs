//! # Hotel back office
//!
//! Rooms, guests, reservations with check-in / check-out, housekeeping
//! tasks and a lightweight ledger, served as a REST API.
//!
//! ## Architecture
//!
//! - **domain**: entities, state rules and the unit-of-work boundary
//! - **application**: services for operations that span several records
//! - **infrastructure**: SeaORM storage and the in-memory backend
//! - **interfaces**: HTTP handlers, router and Swagger documentation
//! - **server**: process bootstrap and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::create_api_router;
