pub mod entities;
pub mod mapping;
pub mod migrator;
pub mod unit_of_work;

pub use unit_of_work::SeaOrmUnitOfWork;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::shared::errors::DomainError;

/// Connection pool sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    /// Seconds to wait for a free connection
    pub acquire_timeout: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: 10,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./hotel.db?mode=rwc")
    pub url: String,
    pub pool: PoolConfig,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::sqlite("./hotel.db")
    }
}

impl DatabaseConfig {
    /// Create config for SQLite
    pub fn sqlite(path: &str) -> Self {
        Self {
            url: format!("sqlite://{}?mode=rwc", path),
            pool: PoolConfig::default(),
        }
    }

    /// Private in-memory SQLite database. A single connection keeps every
    /// query on the same database.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            pool: PoolConfig {
                max_connections: 1,
                min_connections: 1,
                ..PoolConfig::default()
            },
        }
    }
}

/// Initialize database connection
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    info!("Connecting to database: {}", config.url);
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.pool.max_connections)
        .min_connections(config.pool.min_connections)
        .acquire_timeout(Duration::from_secs(config.pool.acquire_timeout))
        .sqlx_logging(false);
    if config.url.contains(":memory:") {
        // A recycled connection would come back with an empty database.
        let forever = Duration::from_secs(365 * 24 * 60 * 60);
        options.idle_timeout(forever).max_lifetime(forever);
    }
    let db = Database::connect(options).await?;
    info!("Database connected successfully");
    Ok(db)
}

/// Map a failed write, turning constraint violations into conflicts.
pub fn write_err(e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => DomainError::Conflict(detail),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => DomainError::Conflict(
            "Record is referenced by, or refers to, missing records".to_string(),
        ),
        _ => DomainError::from(e),
    }
}

/// Fresh migrated in-memory database for tests.
#[cfg(test)]
pub async fn test_connection() -> DatabaseConnection {
    use sea_orm_migration::MigratorTrait;

    let db = init_database(&DatabaseConfig::in_memory())
        .await
        .expect("in-memory sqlite");
    migrator::Migrator::up(&db, None)
        .await
        .expect("migrations");
    db
}

/// Migrated SQLite file behind the default multi-connection pool. Returns
/// the path so the test can remove the file afterwards.
#[cfg(test)]
pub async fn test_file_connection() -> (DatabaseConnection, std::path::PathBuf) {
    use sea_orm_migration::MigratorTrait;

    let path = std::env::temp_dir().join(format!("hotel-test-{}.db", uuid::Uuid::new_v4()));
    let config = DatabaseConfig::sqlite(&path.to_string_lossy());
    assert!(config.pool.max_connections > 1);

    let db = init_database(&config).await.expect("sqlite file");
    migrator::Migrator::up(&db, None)
        .await
        .expect("migrations");
    (db, path)
}

/// Close the pool and delete the database file with its journal files.
#[cfg(test)]
pub async fn remove_test_file(db: DatabaseConnection, path: &std::path::Path) {
    let _ = db.close().await;
    for suffix in ["", "-wal", "-shm", "-journal"] {
        let mut file = path.as_os_str().to_owned();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}
