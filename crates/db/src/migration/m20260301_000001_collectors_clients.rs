//! Collectors and client accounts.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Collectors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Collectors::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Collectors::Name).string_len(120).not_null())
                    .col(
                        ColumnDef::new(Collectors::Role)
                            .string_len(16)
                            .not_null()
                            .default("cobrador"),
                    )
                    .col(
                        ColumnDef::new(Collectors::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Collectors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Collectors::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Clients::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Clients::Code).string_len(32).not_null())
                    .col(ColumnDef::new(Clients::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Clients::Address).text().null())
                    .col(ColumnDef::new(Clients::Phone).string_len(32).null())
                    // Balance never goes negative
                    .col(
                        ColumnDef::new(Clients::Balance)
                            .decimal_len(14, 2)
                            .not_null()
                            .default(0)
                            .check(Expr::col(Clients::Balance).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Clients::PaymentAmount)
                            .decimal_len(14, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Clients::Periodicity)
                            .string_len(16)
                            .not_null()
                            .default("semanal"),
                    )
                    .col(ColumnDef::new(Clients::PaymentDay).string_len(16).null())
                    .col(
                        ColumnDef::new(Clients::Status)
                            .string_len(16)
                            .not_null()
                            .default("activo"),
                    )
                    .col(ColumnDef::new(Clients::CollectorId).uuid().null())
                    .col(
                        ColumnDef::new(Clients::Version)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Clients::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Clients::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clients_collector")
                            .from(Clients::Table, Clients::CollectorId)
                            .to(Collectors::Table, Collectors::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_clients_code")
                    .table(Clients::Table)
                    .col(Clients::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Collector route listing
        manager
            .create_index(
                Index::create()
                    .name("idx_clients_collector_status")
                    .table(Clients::Table)
                    .col(Clients::CollectorId)
                    .col(Clients::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Clients::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Collectors::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Collectors {
    Table,
    Id,
    Name,
    Role,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Clients {
    Table,
    Id,
    Code,
    Name,
    Address,
    Phone,
    Balance,
    PaymentAmount,
    Periodicity,
    PaymentDay,
    Status,
    CollectorId,
    Version,
    CreatedAt,
    UpdatedAt,
}
