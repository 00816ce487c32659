//! Insert-only payment history.

use sea_orm_migration::prelude::*;

use super::m20260301_000001_collectors_clients::{Clients, Collectors};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Payments::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Payments::ClientId).uuid().not_null())
                    .col(ColumnDef::new(Payments::CollectorId).uuid().not_null())
                    .col(
                        ColumnDef::new(Payments::Amount)
                            .decimal_len(14, 2)
                            .not_null()
                            .check(Expr::col(Payments::Amount).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Payments::SubmittedAmount)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payments::Concept).text().null())
                    .col(ColumnDef::new(Payments::PaymentType).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Payments::PaidAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::BalanceBefore)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::BalanceAfter)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::Method)
                            .string_len(16)
                            .not_null()
                            .default("efectivo"),
                    )
                    .col(ColumnDef::new(Payments::ReceiptNumber).string_len(64).not_null())
                    .col(ColumnDef::new(Payments::LocalId).string_len(64).null())
                    .col(
                        ColumnDef::new(Payments::Printed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Payments::Synchronized)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Payments::Sequence).big_integer().not_null())
                    .col(
                        ColumnDef::new(Payments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_client")
                            .from(Payments::Table, Payments::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_collector")
                            .from(Payments::Table, Payments::CollectorId)
                            .to(Collectors::Table, Collectors::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Duplicate-submission key for at-least-once sync sources.
        // Adjustments key on their target balance.
        manager
            .create_index(
                Index::create()
                    .name("uq_payments_submission")
                    .table(Payments::Table)
                    .col(Payments::ClientId)
                    .col(Payments::CollectorId)
                    .col(Payments::SubmittedAmount)
                    .col(Payments::PaidAt)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One record per client version
        manager
            .create_index(
                Index::create()
                    .name("uq_payments_client_sequence")
                    .table(Payments::Table)
                    .col(Payments::ClientId)
                    .col(Payments::Sequence)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Last regular payment lookup for overdue reporting
        manager
            .create_index(
                Index::create()
                    .name("idx_payments_client_type_paid_at")
                    .table(Payments::Table)
                    .col(Payments::ClientId)
                    .col(Payments::PaymentType)
                    .col(Payments::PaidAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_collector_local_id")
                    .table(Payments::Table)
                    .col(Payments::CollectorId)
                    .col(Payments::LocalId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    ClientId,
    CollectorId,
    Amount,
    SubmittedAmount,
    Concept,
    PaymentType,
    PaidAt,
    BalanceBefore,
    BalanceAfter,
    Method,
    ReceiptNumber,
    LocalId,
    Printed,
    Synchronized,
    Sequence,
    CreatedAt,
}
