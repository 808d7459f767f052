//! Create housekeeping_tasks table

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_rooms::Rooms;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HousekeepingTasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HousekeepingTasks::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HousekeepingTasks::RoomId).string().not_null())
                    .col(ColumnDef::new(HousekeepingTasks::TaskType).string().not_null())
                    .col(
                        ColumnDef::new(HousekeepingTasks::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(HousekeepingTasks::Priority)
                            .string()
                            .not_null()
                            .default("medium"),
                    )
                    .col(ColumnDef::new(HousekeepingTasks::AssignedTo).string())
                    .col(ColumnDef::new(HousekeepingTasks::Notes).text())
                    .col(ColumnDef::new(HousekeepingTasks::ScheduledFor).date())
                    .col(ColumnDef::new(HousekeepingTasks::CompletedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(HousekeepingTasks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HousekeepingTasks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_housekeeping_tasks_room")
                            .from(HousekeepingTasks::Table, HousekeepingTasks::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_housekeeping_tasks_room")
                    .table(HousekeepingTasks::Table)
                    .col(HousekeepingTasks::RoomId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HousekeepingTasks::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum HousekeepingTasks {
    Table,
    Id,
    RoomId,
    TaskType,
    Status,
    Priority,
    AssignedTo,
    Notes,
    ScheduledFor,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}
