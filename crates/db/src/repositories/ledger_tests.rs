//! Races the write path against a stale client snapshot.
//!
//! A single-connection pool serializes every writer, so these tests take the
//! snapshot first, let another write land, and only then run the insert and
//! version bump against the outdated row.

#![allow(clippy::unwrap_used)]

use chrono::{DateTime, TimeZone, Utc};
use collecta_core::ledger::{LedgerError, PaymentCommand, PaymentKind, apply_payment};
use collecta_core::{CollectorRole, Periodicity};
use collecta_shared::DatabaseConfig;
use collecta_shared::types::{ClientId, CollectorId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, TransactionTrait,
};

use super::{Applied, LedgerRepository, PaymentOutcome};
use crate::entities::{clients, payments};
use crate::migration::{Migrator, MigratorTrait};
use crate::repositories::{
    ClientRepository, CollectorRepository, CreateClientInput, CreateCollectorInput,
};

async fn setup() -> (DatabaseConnection, ClientId, CollectorId) {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        sql_logging: false,
    };
    let db = crate::connect(&config).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let collector = CollectorRepository::new(db.clone())
        .create(CreateCollectorInput {
            name: "Ruta Norte".to_string(),
            role: CollectorRole::Collector,
        })
        .await
        .unwrap();
    let client = ClientRepository::new(db.clone())
        .create(CreateClientInput {
            code: "CLI001".to_string(),
            name: "Cliente CLI001".to_string(),
            address: None,
            phone: None,
            opening_balance: dec!(500),
            payment_amount: dec!(100),
            periodicity: Periodicity::Weekly,
            payment_day: None,
            collector_id: None,
        })
        .await
        .unwrap();

    (
        db,
        ClientId::from_uuid(client.id),
        CollectorId::from_uuid(collector.id),
    )
}

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, hour, 0, 0).unwrap()
}

fn regular(client: ClientId, collector: CollectorId, amount: Decimal, hour: u32) -> PaymentCommand {
    PaymentCommand::new(client, collector, PaymentKind::Regular { amount }, at(hour))
}

async fn snapshot(db: &DatabaseConnection, client: ClientId) -> clients::Model {
    clients::Entity::find_by_id(client.into_inner())
        .one(db)
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn test_version_bump_against_stale_snapshot_is_concurrent_modification() {
    let (db, client, collector) = setup().await;
    let ledger = LedgerRepository::new(db.clone());
    let stale = snapshot(&db, client).await;

    // Another writer moves the version without leaving a record behind.
    clients::Entity::update_many()
        .col_expr(clients::Column::Version, Expr::value(stale.version + 1))
        .filter(clients::Column::Id.eq(client.into_inner()))
        .exec(&db)
        .await
        .unwrap();

    let command = regular(client, collector, dec!(100), 9);
    let txn = db.begin().await.unwrap();
    let written = LedgerRepository::apply_to(&txn, &command, &stale).await;
    let err = ledger.settle(txn, written).await.unwrap_err();

    assert_eq!(err, LedgerError::ConcurrentModification(client.into_inner()));
    assert_eq!(payments::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(snapshot(&db, client).await.balance, dec!(500));
}

#[tokio::test]
async fn test_taken_sequence_is_concurrent_modification() {
    let (db, client, collector) = setup().await;
    let ledger = LedgerRepository::new(db.clone());
    let stale = snapshot(&db, client).await;

    let winner = ledger
        .record_payment(regular(client, collector, dec!(100), 9))
        .await
        .unwrap();
    assert_eq!(winner.record().sequence, stale.version + 1);

    let command = regular(client, collector, dec!(40), 10);
    let txn = db.begin().await.unwrap();
    let written = LedgerRepository::apply_to(&txn, &command, &stale).await;
    let err = ledger.settle(txn, written).await.unwrap_err();

    assert_eq!(err, LedgerError::ConcurrentModification(client.into_inner()));
    assert_eq!(payments::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(snapshot(&db, client).await.balance, dec!(400));
}

#[tokio::test]
async fn test_submission_index_hit_resolves_to_duplicate() {
    let (db, client, collector) = setup().await;
    let ledger = LedgerRepository::new(db.clone());
    let command = regular(client, collector, dec!(100), 9);

    let first = ledger.record_payment(command.clone()).await.unwrap();
    assert!(!first.is_duplicate());

    // Skip the duplicate lookup so the insert itself hits the unique index.
    let current = snapshot(&db, client).await;
    let change = apply_payment(current.balance, &command.kind);
    let txn = db.begin().await.unwrap();
    let written = LedgerRepository::store(
        &txn,
        &command,
        &current,
        &change,
        command.duplicate_key(),
    )
    .await
    .map(|record| Applied::Recorded { record, change });
    let outcome = ledger.settle(txn, written).await.unwrap();

    match outcome {
        PaymentOutcome::Duplicate { record, balance } => {
            assert_eq!(record.id, first.record().id);
            assert_eq!(balance, dec!(400));
        }
        PaymentOutcome::Recorded { .. } => panic!("expected a duplicate outcome"),
    }
    assert_eq!(payments::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(snapshot(&db, client).await.version, current.version);
}
