//! Guest aggregate

pub mod model;

pub use model::Guest;
