//! Overdue report over active client accounts.
//!
//! The baseline for each client is its latest `regular` payment, or the
//! account's creation date when it has never paid.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use collecta_core::Periodicity;
use collecta_core::overdue::overdue_days;
use collecta_shared::types::{ClientId, CollectorId};
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect, QueryTrait,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::{ClientStatus, PaymentType};
use crate::entities::{clients, payments};

/// Filter options for the overdue report.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverdueFilter {
    /// Restrict to one collector's route.
    pub collector_id: Option<CollectorId>,
    /// Include clients that are not overdue.
    pub include_current: bool,
}

/// One line of the overdue report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverdueClient {
    /// Client id.
    pub client_id: ClientId,
    /// Client code.
    pub code: String,
    /// Client name.
    pub name: String,
    /// Assigned collector.
    pub collector_id: Option<CollectorId>,
    /// Outstanding balance.
    pub balance: Decimal,
    /// Payment cycle.
    pub periodicity: Periodicity,
    /// Latest regular payment, if any.
    pub last_payment_at: Option<DateTime<Utc>>,
    /// Days past the payment cycle.
    pub overdue_days: i64,
}

/// Repository computing overdue days from stored payments.
#[derive(Debug, Clone)]
pub struct OverdueRepository {
    db: DatabaseConnection,
}

/// Restricts a query to the accounts the report covers.
fn scoped<Q: QueryFilter + QueryTrait>(query: Q, filter: OverdueFilter) -> Q {
    query
        .filter(clients::Column::Status.eq(ClientStatus::Activo))
        .filter(clients::Column::Balance.gt(Decimal::ZERO))
        .apply_if(filter.collector_id, |q, id| {
            q.filter(clients::Column::CollectorId.eq(id.into_inner()))
        })
}

impl OverdueRepository {
    /// Creates a new overdue repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists active clients with an outstanding balance, most overdue first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn overdue_clients(
        &self,
        filter: OverdueFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<OverdueClient>, DbErr> {
        let accounts = scoped(clients::Entity::find(), filter)
            .all(&self.db)
            .await?;
        if accounts.is_empty() {
            return Ok(Vec::new());
        }

        let last_payments = self.last_regular_payments(filter).await?;

        let mut report: Vec<OverdueClient> = accounts
            .into_iter()
            .map(|client| {
                let periodicity = Periodicity::from(client.periodicity);
                let last_payment_at = last_payments.get(&client.id).copied();
                let baseline = last_payment_at.unwrap_or_else(|| client.created_at.to_utc());
                OverdueClient {
                    client_id: ClientId::from_uuid(client.id),
                    code: client.code,
                    name: client.name,
                    collector_id: client.collector_id.map(CollectorId::from_uuid),
                    balance: client.balance,
                    periodicity,
                    last_payment_at,
                    overdue_days: overdue_days(Some(baseline), periodicity, now),
                }
            })
            .filter(|line| filter.include_current || line.overdue_days > 0)
            .collect();

        report.sort_by(|a, b| {
            b.overdue_days
                .cmp(&a.overdue_days)
                .then_with(|| a.code.cmp(&b.code))
        });
        Ok(report)
    }

    /// Latest regular payment per client in scope, aggregated in the database.
    async fn last_regular_payments(
        &self,
        filter: OverdueFilter,
    ) -> Result<HashMap<Uuid, DateTime<Utc>>, DbErr> {
        let query = payments::Entity::find()
            .select_only()
            .column(payments::Column::ClientId)
            .column_as(payments::Column::PaidAt.max(), "last_paid_at")
            .inner_join(clients::Entity)
            .filter(payments::Column::PaymentType.eq(PaymentType::Regular))
            .group_by(payments::Column::ClientId);
        let rows: Vec<(Uuid, DateTimeWithTimeZone)> =
            scoped(query, filter).into_tuple().all(&self.db).await?;

        Ok(rows
            .into_iter()
            .map(|(client_id, paid_at)| (client_id, paid_at.to_utc()))
            .collect())
    }
}
