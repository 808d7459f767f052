//! Housekeeping module: cleaning, maintenance and inspection tasks

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
