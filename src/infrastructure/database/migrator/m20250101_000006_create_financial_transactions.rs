//! Create financial_transactions table

use sea_orm_migration::prelude::*;

use super::m20250101_000005_create_accounts::Accounts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FinancialTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FinancialTransactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FinancialTransactions::AccountId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FinancialTransactions::CounterAccountId).string())
                    .col(
                        ColumnDef::new(FinancialTransactions::Direction)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialTransactions::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialTransactions::Description)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FinancialTransactions::Reference).string())
                    .col(
                        ColumnDef::new(FinancialTransactions::TransactionDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialTransactions::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(FinancialTransactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialTransactions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_financial_transactions_account")
                            .from(FinancialTransactions::Table, FinancialTransactions::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_financial_transactions_counter_account")
                            .from(
                                FinancialTransactions::Table,
                                FinancialTransactions::CounterAccountId,
                            )
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_financial_transactions_account")
                    .table(FinancialTransactions::Table)
                    .col(FinancialTransactions::AccountId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FinancialTransactions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum FinancialTransactions {
    Table,
    Id,
    AccountId,
    CounterAccountId,
    Direction,
    Amount,
    Description,
    Reference,
    TransactionDate,
    Status,
    CreatedAt,
    UpdatedAt,
}
