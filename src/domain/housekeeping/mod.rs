//! Housekeeping aggregate

pub mod model;

pub use model::{
    HousekeepingTask, TaskChanges, TaskPriority, TaskStatus, TaskType, POST_CHECKOUT_NOTE,
};
