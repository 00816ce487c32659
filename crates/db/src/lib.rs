//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Database migrations
//! - Repository abstractions for data access, including the transactional
//!   client balance ledger

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    BalanceAdjustment, BalanceImportItem, BatchFailure, BatchImportResult, ClientError,
    ClientRepository, CollectorRepository, CreateClientInput, CreateCollectorInput, HistoryReport,
    LedgerRepository, OfflinePayment, OverdueClient, OverdueFilter, OverdueRepository,
    PaymentOutcome, PaymentRepository, SyncFailure, SyncReport,
};

use collecta_shared::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection pool to the configured database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(config.sql_logging);

    tracing::debug!(
        max_connections = config.max_connections,
        "connecting to database"
    );
    Database::connect(options).await
}
