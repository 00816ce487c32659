//! Shared fixtures for the database integration tests.
//!
//! Every test gets its own in-memory SQLite database migrated with the real
//! migrator. The pool holds a single connection so the database lives as long
//! as the pool.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use collecta_core::{CollectorRole, Periodicity};
use collecta_db::migration::{Migrator, MigratorTrait};
use collecta_db::{ClientRepository, CollectorRepository, CreateClientInput, CreateCollectorInput};
use collecta_shared::DatabaseConfig;
use collecta_shared::types::{ClientId, CollectorId};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

pub async fn setup() -> DatabaseConnection {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        sql_logging: false,
    };
    let db = collecta_db::connect(&config)
        .await
        .expect("failed to open in-memory database");
    Migrator::up(&db, None).await.expect("migrations failed");
    db
}

/// Fixed point in time the tests are written against.
pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
}

pub async fn seed_collector(db: &DatabaseConnection, name: &str) -> CollectorId {
    let collector = CollectorRepository::new(db.clone())
        .create(CreateCollectorInput {
            name: name.to_string(),
            role: CollectorRole::Collector,
        })
        .await
        .expect("failed to create collector");
    CollectorId::from_uuid(collector.id)
}

pub async fn seed_admin(db: &DatabaseConnection) -> CollectorId {
    let admin = CollectorRepository::new(db.clone())
        .create(CreateCollectorInput {
            name: "Oficina".to_string(),
            role: CollectorRole::Admin,
        })
        .await
        .expect("failed to create admin");
    CollectorId::from_uuid(admin.id)
}

pub fn client_input(code: &str, balance: Decimal, periodicity: Periodicity) -> CreateClientInput {
    CreateClientInput {
        code: code.to_string(),
        name: format!("Cliente {code}"),
        address: None,
        phone: None,
        opening_balance: balance,
        payment_amount: Decimal::new(10_000, 2),
        periodicity,
        payment_day: Some("lunes".to_string()),
        collector_id: None,
    }
}

pub async fn seed_client(
    db: &DatabaseConnection,
    code: &str,
    balance: Decimal,
    collector: Option<CollectorId>,
) -> ClientId {
    let input = CreateClientInput {
        collector_id: collector,
        ..client_input(code, balance, Periodicity::Weekly)
    };
    let client = ClientRepository::new(db.clone())
        .create(input)
        .await
        .expect("failed to create client");
    ClientId::from_uuid(client.id)
}
