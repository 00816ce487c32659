//! Client account repository.
//!
//! Balances are only written through [`LedgerRepository`](super::LedgerRepository);
//! this repository onboards clients and manages their status.

use chrono::Utc;
use collecta_core::ledger::{LedgerError, validate_amount};
use collecta_core::{ClientStatus, Periodicity};
use collecta_shared::types::{ClientId, CollectorId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use crate::entities::{clients, sea_orm_active_enums};

/// Error types for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Client not found.
    #[error("Client not found: {0}")]
    NotFound(Uuid),

    /// Another client already uses the code.
    #[error("Client code already exists: {0}")]
    DuplicateCode(String),

    /// Opening balance or installment is invalid.
    #[error(transparent)]
    Validation(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for onboarding a client.
#[derive(Debug, Clone)]
pub struct CreateClientInput {
    /// Human readable unique code.
    pub code: String,
    /// Client name.
    pub name: String,
    /// Optional street address.
    pub address: Option<String>,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Balance the account opens with.
    pub opening_balance: Decimal,
    /// Agreed installment.
    pub payment_amount: Decimal,
    /// Payment cycle.
    pub periodicity: Periodicity,
    /// Agreed payment day, e.g. a weekday.
    pub payment_day: Option<String>,
    /// Assigned collector.
    pub collector_id: Option<CollectorId>,
}

/// Repository for client accounts.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    db: DatabaseConnection,
}

impl ClientRepository {
    /// Creates a new client repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Onboards a client with its opening balance.
    ///
    /// No payment record is written; the opening balance starts the history chain.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The opening balance or installment is negative or finer than cents
    /// - The code is already taken
    /// - Database operation fails
    pub async fn create(&self, input: CreateClientInput) -> Result<clients::Model, ClientError> {
        let balance = validate_amount(input.opening_balance)?;
        let payment_amount = validate_amount(input.payment_amount)?;
        let code = input.code.trim().to_string();
        if code.is_empty() {
            return Err(LedgerError::MissingField("code").into());
        }

        let now = Utc::now().into();
        let client = clients::ActiveModel {
            id: Set(ClientId::new().into_inner()),
            code: Set(code.clone()),
            name: Set(input.name),
            address: Set(input.address),
            phone: Set(input.phone),
            balance: Set(balance),
            payment_amount: Set(payment_amount),
            periodicity: Set(input.periodicity.into()),
            payment_day: Set(input.payment_day),
            status: Set(sea_orm_active_enums::ClientStatus::Activo),
            collector_id: Set(input.collector_id.map(CollectorId::into_inner)),
            version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        client.insert(&self.db).await.map_err(|err| {
            if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                ClientError::DuplicateCode(code)
            } else {
                ClientError::Database(err)
            }
        })
    }

    /// Finds a client by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: ClientId) -> Result<Option<clients::Model>, DbErr> {
        clients::Entity::find_by_id(id.into_inner()).one(&self.db).await
    }

    /// Finds a client by its code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<clients::Model>, DbErr> {
        clients::Entity::find()
            .filter(clients::Column::Code.eq(code.trim()))
            .one(&self.db)
            .await
    }

    /// Activates or deactivates a client. Clients are never deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the client does not exist or the update fails.
    pub async fn set_status(
        &self,
        id: ClientId,
        status: ClientStatus,
    ) -> Result<clients::Model, ClientError> {
        let client = self
            .find_by_id(id)
            .await?
            .ok_or(ClientError::NotFound(id.into_inner()))?;

        let mut active: clients::ActiveModel = client.into();
        active.status = Set(status.into());
        active.updated_at = Set(Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Lists the clients on a collector's route, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_collector(
        &self,
        collector_id: CollectorId,
        include_inactive: bool,
    ) -> Result<Vec<clients::Model>, DbErr> {
        let mut query =
            clients::Entity::find().filter(clients::Column::CollectorId.eq(collector_id.into_inner()));
        if !include_inactive {
            query = query.filter(clients::Column::Status.eq(sea_orm_active_enums::ClientStatus::Activo));
        }
        query.order_by_asc(clients::Column::Code).all(&self.db).await
    }
}
