//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_rooms;
mod m20250101_000002_create_guests;
mod m20250101_000003_create_reservations;
mod m20250101_000004_create_housekeeping_tasks;
mod m20250101_000005_create_accounts;
mod m20250101_000006_create_financial_transactions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_rooms::Migration),
            Box::new(m20250101_000002_create_guests::Migration),
            Box::new(m20250101_000003_create_reservations::Migration),
            Box::new(m20250101_000004_create_housekeeping_tasks::Migration),
            Box::new(m20250101_000005_create_accounts::Migration),
            Box::new(m20250101_000006_create_financial_transactions::Migration),
        ]
    }
}
