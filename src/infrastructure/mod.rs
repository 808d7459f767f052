//! Infrastructure layer: SeaORM persistence and the in-memory backend

pub mod database;
pub mod storage;

pub use database::{init_database, DatabaseConfig, PoolConfig, SeaOrmUnitOfWork};
pub use storage::InMemoryUnitOfWork;
